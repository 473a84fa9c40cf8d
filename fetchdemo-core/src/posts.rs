use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{model::FetchState, view::View};

pub const DEFAULT_POSTS_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Posts shown per page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Zero-based page actually shown (requests past the end are clamped).
    pub page: usize,
    pub total_pages: usize,
    pub total_posts: usize,
}

/// View for the post list screen. An empty array, or a payload that is not a
/// list of `{id, title}` objects, renders as [`View::Empty`].
pub fn post_list_view(state: &FetchState, page: usize) -> View<PostPage> {
    View::from_state(state, |data| paginate(data, page))
}

fn paginate(data: &Value, page: usize) -> Option<PostPage> {
    let posts: Vec<Post> = match serde_json::from_value(data.clone()) {
        Ok(posts) => posts,
        Err(err) => {
            warn!(error = %err, "post list payload has an unexpected shape");
            return None;
        }
    };

    if posts.is_empty() {
        return None;
    }

    let total_posts = posts.len();
    let total_pages = total_posts.div_ceil(PAGE_SIZE);
    let page = page.min(total_pages - 1);

    let posts = posts
        .into_iter()
        .skip(page * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Some(PostPage {
        posts,
        page,
        total_pages,
        total_posts,
    })
}
