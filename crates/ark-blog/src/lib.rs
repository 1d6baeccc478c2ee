//! Client library for the Ark Blog platform
//!
//! [`api`] wraps the backend routes in typed services, [`session`] keeps the
//! bearer token and user id, [`hydrate`] fills in cover images and tags of
//! fetched post lists, and [`feed`] and [`editor`] build the reading and
//! writing workflows on top.
//!
//! ```no_run
//! use ark_blog::api::BlogService;
//! use ark_blog::feed::Feed;
//! use ark_blog::session::Session;
//! use ark_http_client::HttpClient;
//!
//! # async fn example() {
//! let client = HttpClient::new("http://localhost:5055");
//! let blog = BlogService::new(client, Session::in_memory());
//! let feed = Feed::new(blog, "http://localhost:5055/");
//!
//! let mut home = feed.home().await;
//! home.settle().await;
//! for post in home.top.snapshot().await {
//!     println!("{} {:?}", post.title, post.cover_image_url);
//! }
//! # }
//! ```

pub mod api;
pub mod editor;
pub mod error;
pub mod feed;
pub mod hydrate;
pub mod session;
pub mod text;
pub mod types;

pub use ark_http_client;
pub use error::{Error, Result, ValidationError};
