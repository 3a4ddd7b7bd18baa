//! Post client service

use std::sync::Arc;

use reqwest::{multipart, Method, RequestBuilder};

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{
    CreateResponse, CreatedPost, ImageAttachment, ListResponse, Post, PostImage, PostsUpdate,
    SingleResponse, UpdateBody,
};
use crate::navigator::{Navigator, NoopNavigator, LIST_ROUTE};
use crate::state::PostsState;

const POSTS_PATH: &str = "api/posts";

#[derive(Clone)]
pub struct PostsService {
    api: ApiClient,
    state: PostsState,
    navigator: Arc<dyn Navigator>,
}

impl PostsService {
    pub fn new(api: ApiClient, state: PostsState, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            state,
            navigator,
        }
    }

    /// Service with a fresh state and no navigation
    pub fn headless(api: ApiClient) -> Self {
        Self::new(api, PostsState::new(), Arc::new(NoopNavigator))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &PostsState {
        &self.state
    }

    /// Fetch one page, replace the cache, and publish to subscribers.
    ///
    /// A `page_size` of 0 fetches every post.
    pub async fn get_posts(&self, page_size: u32, page: u32) -> Result<PostsUpdate> {
        let response = self
            .api
            .request(Method::GET, POSTS_PATH)
            .await?
            .query(&[("pagesize", page_size), ("page", page)])
            .send()
            .await?;

        let body: ListResponse = ApiClient::handle(response).await?;
        let update = PostsUpdate {
            posts: body.posts.into_iter().map(Post::from).collect(),
            post_count: body.max_posts,
        };

        self.state.replace(update.clone()).await;
        Ok(update)
    }

    pub async fn get_post(&self, id: &str) -> Result<Post> {
        let response = self
            .api
            .request(Method::GET, &post_path(id))
            .await?
            .send()
            .await?;

        let body: SingleResponse = ApiClient::handle(response).await?;
        Ok(body.post.into())
    }

    /// Create a post, then return to the list view.
    ///
    /// The cache is not touched; the list view's next `get_posts` picks the
    /// post up.
    pub async fn add_post(
        &self,
        title: &str,
        content: &str,
        image: ImageAttachment,
    ) -> Result<CreatedPost> {
        let form = multipart::Form::new()
            .text("title", title.to_string())
            .text("content", content.to_string())
            .part("image", image_part(image)?);

        let response = self
            .api
            .request(Method::POST, POSTS_PATH)
            .await?
            .multipart(form)
            .send()
            .await?;

        let body: CreateResponse = ApiClient::handle(response).await?;
        tracing::debug!(post_id = %body.post.id, "Post created");

        self.navigator.navigate(LIST_ROUTE);
        Ok(body.post)
    }

    /// Replace a post's fields, then return to the list view.
    ///
    /// Sends multipart when a new image is attached and JSON otherwise.
    pub async fn update_post(
        &self,
        id: &str,
        title: &str,
        content: &str,
        image: PostImage,
    ) -> Result<()> {
        let builder = self.api.request(Method::PUT, &post_path(id)).await?;
        let builder = match image {
            PostImage::Upload(attachment) => builder.multipart(
                multipart::Form::new()
                    .text("id", id.to_string())
                    .text("title", title.to_string())
                    .text("content", content.to_string())
                    .part("image", image_part(attachment)?),
            ),
            PostImage::Existing(image_path) => builder.json(&UpdateBody {
                id,
                title,
                content,
                image_path: image_path.as_deref(),
            }),
        };

        ApiClient::handle_unit(builder.send().await?).await?;

        self.navigator.navigate(LIST_ROUTE);
        Ok(())
    }

    /// Build the delete request without sending it.
    ///
    /// Nothing happens until the caller calls `PendingDelete::send`.
    pub async fn delete_post(&self, id: &str) -> Result<PendingDelete> {
        let builder = self.api.request(Method::DELETE, &post_path(id)).await?;
        Ok(PendingDelete {
            id: id.to_string(),
            builder,
        })
    }
}

/// A delete request awaiting dispatch
#[derive(Debug)]
pub struct PendingDelete {
    id: String,
    builder: RequestBuilder,
}

impl PendingDelete {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn send(self) -> Result<()> {
        ApiClient::handle_unit(self.builder.send().await?).await?;
        tracing::debug!(post_id = %self.id, "Post deleted");
        Ok(())
    }
}

fn post_path(id: &str) -> String {
    format!("{POSTS_PATH}/{id}")
}

fn image_part(image: ImageAttachment) -> Result<multipart::Part> {
    let part = multipart::Part::bytes(image.data.to_vec())
        .file_name(image.file_name)
        .mime_str(&image.content_type)?;
    Ok(part)
}
