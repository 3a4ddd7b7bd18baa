//! Post endpoint integration tests
//!
//! - GET    /api/posts       - List with optional pagination
//! - GET    /api/posts/{id}  - Fetch one
//! - POST   /api/posts       - Create with image upload
//! - PUT    /api/posts/{id}  - Owner-filtered replace
//! - DELETE /api/posts/{id}  - Delete by id
//! - GET    /images/{file}   - Serve uploaded images

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use uuid::Uuid;

use crate::common::{
    assertions, json_request, multipart_body, multipart_request, read_json, Part, TestApp,
    MAX_UPLOAD_BYTES, TEST_HOST,
};

const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";

fn create_parts<'a>(
    title: &'a str,
    file_name: &'a str,
    content_type: &'a str,
    data: &'a [u8],
) -> Vec<Part<'a>> {
    vec![
        Part::Text("title", title),
        Part::Text("content", "World"),
        Part::File {
            name: "image",
            file_name,
            content_type,
            data,
        },
    ]
}

mod test_list_posts {
    use super::*;

    async fn seeded(n: usize) -> TestApp {
        let app = TestApp::new();
        let creator = Uuid::new_v4();
        for i in 0..n {
            app.seed_post(&format!("post{i}"), creator).await;
        }
        app
    }

    #[tokio::test]
    async fn test_page_is_bounded_and_max_posts_is_total() {
        let app = seeded(5).await;

        let response = app
            .send(json_request(Method::GET, "/api/posts?pagesize=2&page=2", None, None))
            .await;
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Posts fetched successfully!");
        assert_eq!(body["maxPosts"], 5);
        let titles: Vec<_> = body["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["post2", "post3"]);
    }

    #[tokio::test]
    async fn test_last_page_is_partial() {
        let app = seeded(5).await;

        let response = app
            .send(json_request(Method::GET, "/api/posts?pagesize=2&page=3", None, None))
            .await;
        let (_, body) = read_json(response).await;

        assert_eq!(body["posts"].as_array().unwrap().len(), 1);
        assert_eq!(body["maxPosts"], 5);
    }

    #[tokio::test]
    async fn test_zero_or_missing_page_size_returns_everything() {
        let app = seeded(4).await;

        for uri in [
            "/api/posts",
            "/api/posts?pagesize=0&page=1",
            "/api/posts?page=2",
            "/api/posts?pagesize=abc&page=1",
        ] {
            let (status, body) = app.get_json(uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["posts"].as_array().unwrap().len(), 4, "{uri}");
            assert_eq!(body["maxPosts"], 4, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_records_use_wire_field_names() {
        let app = TestApp::new();
        let creator = Uuid::new_v4();
        let post = app.seed_post("shape", creator).await;

        let (_, body) = app.get_json("/api/posts").await;
        let record = &body["posts"][0];

        assert_eq!(record["_id"], post.id.to_string());
        assert_eq!(record["creator"], creator.to_string());
        assert!(record["imagePath"].is_string());
        assert!(record.get("id").is_none());
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let app = TestApp::new();

        let (status, body) = app.get_json("/api/posts?pagesize=3&page=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["posts"].as_array().unwrap().is_empty());
        assert_eq!(body["maxPosts"], 0);
    }
}

mod test_get_post {
    use super::*;

    #[tokio::test]
    async fn test_existing_post() {
        let app = TestApp::new();
        let post = app.seed_post("single", Uuid::new_v4()).await;

        let uri = format!("/api/posts/{}", post.id);
        let (status, body) = app.get_json(&uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Single Post fetched successfully!");
        assert_eq!(body["post"]["_id"], post.id.to_string());
        assert_eq!(body["post"]["title"], "single");
    }

    #[tokio::test]
    async fn test_missing_post_is_404_without_post_field() {
        let app = TestApp::new();

        for uri in [
            format!("/api/posts/{}", Uuid::new_v4()),
            "/api/posts/not-an-id".to_string(),
        ] {
            let (status, body) = app.get_json(&uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["message"], "Post not found!");
            assert!(body.get("post").is_none());
        }
    }
}

mod test_create_post {
    use super::*;

    #[tokio::test]
    async fn test_create_with_jpeg() {
        let app = TestApp::new();
        let (identity, token) = app.token();

        let request = multipart_request(
            Method::POST,
            "/api/posts",
            Some(&token),
            &create_parts("Hello", "photo.jpg", "image/jpeg", JPEG_BYTES),
        );
        let (status, body) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Post added successfully");
        assert_eq!(body["post"]["title"], "Hello");
        assert_eq!(body["post"]["content"], "World");
        assertions::assert_image_url(body["post"]["imagePath"].as_str().unwrap(), "photo", "jpg");

        let id: Uuid = body["post"]["id"].as_str().unwrap().parse().unwrap();
        let stored = app.posts_find(id).await;
        assert_eq!(stored.creator, identity.user_id);
        assert_eq!(app.image_count(), 1);
    }

    #[tokio::test]
    async fn test_png_keeps_png_extension_and_normalizes_name() {
        let app = TestApp::new();
        let (_, token) = app.token();

        let request = multipart_request(
            Method::POST,
            "/api/posts",
            Some(&token),
            &create_parts("Shot", "My Screen Shot.PNG", "image/png", PNG_BYTES),
        );
        let (status, body) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::CREATED);
        assertions::assert_image_url(
            body["post"]["imagePath"].as_str().unwrap(),
            "my-screen-shot",
            "png",
        );
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_with_json_error() {
        let app = TestApp::new();
        let (_, token) = app.token();
        let oversized = vec![0xFF; MAX_UPLOAD_BYTES + 10];

        let parts = create_parts("Big", "huge.jpg", "image/jpeg", &oversized);
        let content_length = multipart_body(&parts).len();
        let mut request = multipart_request(Method::POST, "/api/posts", Some(&token), &parts);
        request
            .headers_mut()
            .insert(header::CONTENT_LENGTH, content_length.into());

        let (status, body) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assertions::assert_error_body(&body, "PAYLOAD_TOO_LARGE");
        assert_eq!(app.image_count(), 0);
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_disallowed_media_type_creates_nothing() {
        let app = TestApp::new();
        let (_, token) = app.token();

        let request = multipart_request(
            Method::POST,
            "/api/posts",
            Some(&token),
            &create_parts("Gif", "anim.gif", "image/gif", b"GIF89a"),
        );
        let (status, body) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assertions::assert_error_body(&body, "VALIDATION_ERROR");
        assert_eq!(app.image_count(), 0);
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_image_is_rejected() {
        let app = TestApp::new();
        let (_, token) = app.token();

        let request = multipart_request(
            Method::POST,
            "/api/posts",
            Some(&token),
            &[Part::Text("title", "No image"), Part::Text("content", "x")],
        );
        let (status, _) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_blank_title_writes_no_file() {
        let app = TestApp::new();
        let (_, token) = app.token();

        let request = multipart_request(
            Method::POST,
            "/api/posts",
            Some(&token),
            &create_parts("   ", "photo.jpg", "image/jpeg", JPEG_BYTES),
        );
        let (status, _) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.image_count(), 0);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let app = TestApp::new();

        let request = multipart_request(
            Method::POST,
            "/api/posts",
            None,
            &create_parts("Hello", "photo.jpg", "image/jpeg", JPEG_BYTES),
        );
        let (status, body) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assertions::assert_error_body(&body, "MISSING_AUTHORIZATION");
        assert_eq!(app.image_count(), 0);
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_rejects_bad_tokens() {
        let app = TestApp::new();
        let user = Uuid::new_v4().to_string();
        let tokens = [
            crate::common::create_test_jwt(&user, "some-other-secret", 3600),
            crate::common::create_test_jwt(&user, crate::common::TEST_JWT_SECRET, -3600),
            "garbage".to_string(),
        ];

        for token in tokens {
            let request = multipart_request(
                Method::POST,
                "/api/posts",
                Some(&token),
                &create_parts("Hello", "photo.jpg", "image/jpeg", JPEG_BYTES),
            );
            let (status, _) = read_json(app.send(request).await).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_uploaded_image_is_served() {
        let app = TestApp::new();
        let (_, token) = app.token();

        let request = multipart_request(
            Method::POST,
            "/api/posts",
            Some(&token),
            &create_parts("Hello", "photo.jpg", "image/jpeg", JPEG_BYTES),
        );
        let (_, body) = read_json(app.send(request).await).await;
        let url = body["post"]["imagePath"].as_str().unwrap().to_string();
        let path = url
            .strip_prefix(&format!("http://{TEST_HOST}"))
            .unwrap()
            .to_string();

        let response = app
            .send(Request::get(path).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], JPEG_BYTES);
    }

    #[tokio::test]
    async fn test_forwarded_proto_is_used_in_image_url() {
        let app = TestApp::new();
        let (_, token) = app.token();

        let mut request = multipart_request(
            Method::POST,
            "/api/posts",
            Some(&token),
            &create_parts("Hello", "photo.jpg", "image/jpeg", JPEG_BYTES),
        );
        request
            .headers_mut()
            .insert("x-forwarded-proto", "https".parse().unwrap());
        let (_, body) = read_json(app.send(request).await).await;

        let url = body["post"]["imagePath"].as_str().unwrap();
        assert!(url.starts_with(&format!("https://{TEST_HOST}/images/photo-")), "{url}");
    }
}

mod test_update_post {
    use super::*;

    #[tokio::test]
    async fn test_owner_update_with_json_keeps_image_path() {
        let app = TestApp::new();
        let (identity, token) = app.token();
        let post = app.seed_post("before", identity.user_id).await;

        let uri = format!("/api/posts/{}", post.id);
        let request = json_request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({
                "id": post.id,
                "title": "after",
                "content": "new content",
                "imagePath": post.image_path,
            })),
        );
        let (status, body) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post updated successfully");

        let updated = app.posts_find(post.id).await;
        assert_eq!(updated.title, "after");
        assert_eq!(updated.content, "new content");
        assert_eq!(updated.image_path, post.image_path);
        assert_eq!(updated.creator, identity.user_id);
    }

    #[tokio::test]
    async fn test_owner_update_with_new_image() {
        let app = TestApp::new();
        let (identity, token) = app.token();
        let post = app.seed_post("before", identity.user_id).await;

        let uri = format!("/api/posts/{}", post.id);
        let request = multipart_request(
            Method::PUT,
            &uri,
            Some(&token),
            &create_parts("after", "new.png", "image/png", PNG_BYTES),
        );
        let (status, _) = read_json(app.send(request).await).await;
        assert_eq!(status, StatusCode::OK);

        let updated = app.posts_find(post.id).await;
        assertions::assert_image_url(updated.image_path.as_deref().unwrap(), "new", "png");
        assert_eq!(app.image_count(), 1);
    }

    #[tokio::test]
    async fn test_non_owner_update_reports_success_but_changes_nothing() {
        let app = TestApp::new();
        let owner = Uuid::new_v4();
        let post = app.seed_post("original", owner).await;
        let (_, stranger_token) = app.token();

        let uri = format!("/api/posts/{}", post.id);
        let body = json!({"title": "hijacked", "content": "x", "imagePath": null});

        let (status, _) = read_json(
            app.send(json_request(Method::PUT, &uri, Some(&stranger_token), Some(body.clone())))
                .await,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // No credential at all: still 200, still nothing changed
        let (status, _) =
            read_json(app.send(json_request(Method::PUT, &uri, None, Some(body))).await).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(app.posts_find(post.id).await, post);
    }

    #[tokio::test]
    async fn test_unknown_id_reports_success() {
        let app = TestApp::new();
        let (_, token) = app.token();

        for uri in [
            format!("/api/posts/{}", Uuid::new_v4()),
            "/api/posts/not-an-id".to_string(),
        ] {
            let request = json_request(
                Method::PUT,
                &uri,
                Some(&token),
                Some(json!({"title": "t", "content": "c"})),
            );
            let (status, _) = read_json(app.send(request).await).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
        }
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_credential_is_rejected() {
        let app = TestApp::new();
        let post = app.seed_post("original", Uuid::new_v4()).await;

        let uri = format!("/api/posts/{}", post.id);
        let request = json_request(
            Method::PUT,
            &uri,
            Some("not-a-jwt"),
            Some(json!({"title": "t", "content": "c"})),
        );
        let (status, _) = read_json(app.send(request).await).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_disallowed_image_on_update_is_rejected() {
        let app = TestApp::new();
        let (identity, token) = app.token();
        let post = app.seed_post("before", identity.user_id).await;

        let uri = format!("/api/posts/{}", post.id);
        let request = multipart_request(
            Method::PUT,
            &uri,
            Some(&token),
            &create_parts("after", "doc.pdf", "application/pdf", b"%PDF"),
        );
        let (status, _) = read_json(app.send(request).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.image_count(), 0);
        assert_eq!(app.posts_find(post.id).await.title, "before");
    }
}

mod test_delete_post {
    use super::*;

    #[tokio::test]
    async fn test_delete_existing() {
        let app = TestApp::new();
        let (identity, token) = app.token();
        let post = app.seed_post("doomed", identity.user_id).await;

        let uri = format!("/api/posts/{}", post.id);
        let (status, body) =
            read_json(app.send(json_request(Method::DELETE, &uri, Some(&token), None)).await).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post deleted!");
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_reports_success() {
        let app = TestApp::new();
        let (_, token) = app.token();

        for uri in [
            format!("/api/posts/{}", Uuid::new_v4()),
            "/api/posts/not-an-id".to_string(),
        ] {
            let (status, _) =
                read_json(app.send(json_request(Method::DELETE, &uri, Some(&token), None)).await)
                    .await;
            assert_eq!(status, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_delete_does_not_check_ownership() {
        let app = TestApp::new();
        let post = app.seed_post("someone else's", Uuid::new_v4()).await;
        let (_, token) = app.token();

        let uri = format!("/api/posts/{}", post.id);
        let (status, _) =
            read_json(app.send(json_request(Method::DELETE, &uri, Some(&token), None)).await).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.post_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_requires_authentication() {
        let app = TestApp::new();
        let post = app.seed_post("kept", Uuid::new_v4()).await;

        let uri = format!("/api/posts/{}", post.id);
        let (status, _) =
            read_json(app.send(json_request(Method::DELETE, &uri, None, None)).await).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(app.post_count().await, 1);
    }
}
