pub mod delete;
pub mod download;
pub mod feed;
pub mod login;
pub mod logout;
pub mod new_post;
pub mod post;
pub mod posts;
pub mod register;
pub mod save;
pub mod status;
pub mod tagged;
pub mod tags;
pub mod upload_image;
