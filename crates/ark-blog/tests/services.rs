//! Route and session tests for the blog services using mockito

use ark_blog::api::{AuthService, BlogService, TagService};
use ark_blog::session::Session;
use ark_blog::types::{
    AddTagsToPostRequest, CreateBlogPostRequest, Identifier, LoginRequest, RegisterRequest,
    UpdateBlogPostRequest,
};
use ark_blog::{Error, ValidationError};
use ark_http_client::{FilePart, HttpClient};
use mockito::Matcher;

fn services(server: &mockito::Server) -> (BlogService, TagService, AuthService, Session) {
    let client = HttpClient::new(server.url());
    let session = Session::in_memory();
    (
        BlogService::new(client.clone(), session.clone()),
        TagService::new(client.clone(), session.clone()),
        AuthService::new(client, session.clone()),
        session,
    )
}

fn register_request() -> RegisterRequest {
    RegisterRequest {
        name_surname: "Ada Lovelace".to_string(),
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "secret1".to_string(),
        password_confirm: "secret1".to_string(),
    }
}

// === Posts ===

#[tokio::test]
async fn test_counted_routes() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let top = server
        .mock("GET", "/Post/GetTop/5")
        .with_status(200)
        .with_body(r#"[{"id": 1, "title": "a"}]"#)
        .create_async()
        .await;
    let picks = server
        .mock("GET", "/Post/GetEditorPicks/3")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let latest = server
        .mock("GET", "/Post/GetLatest/10")
        .with_status(200)
        .with_body(r#"[{"id": "x-1", "title": "b"}, {"title": "c"}]"#)
        .create_async()
        .await;

    let top_posts = blog.get_top_posts(5).await.expect("top");
    assert_eq!(top_posts[0].id, Some(Identifier::Number(1)));
    assert!(blog.get_editor_picks(3).await.expect("picks").is_empty());
    let latest_posts = blog.get_latest_posts(10).await.expect("latest");
    assert_eq!(latest_posts[0].id_segment().as_deref(), Some("x-1"));
    assert_eq!(latest_posts[1].id, None);

    top.assert_async().await;
    picks.assert_async().await;
    latest.assert_async().await;
}

#[tokio::test]
async fn test_paged_routes() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let all = server
        .mock("GET", "/Post")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let published = server
        .mock("GET", "/Post/Published")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
            Matcher::UrlEncoded("isPublished".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id": 9, "title": "p", "isPublished": true}]"#)
        .create_async()
        .await;

    blog.get_blog_posts(1, 10).await.expect("all posts");
    let posts = blog.get_published_posts(2, 5).await.expect("published");
    assert!(posts[0].is_published());

    all.assert_async().await;
    published.assert_async().await;
}

#[tokio::test]
async fn test_post_by_id_tag_and_cover_routes() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let by_id = server
        .mock("GET", "/Post/12")
        .with_status(200)
        .with_body(r#"{"id": 12, "title": "t", "content": "<p>c</p>"}"#)
        .create_async()
        .await;
    let by_tag = server
        .mock("GET", "/Post/GetPostsByTag/rust")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let cover = server
        .mock("GET", "/Post/GetCoverImage/12")
        .with_status(200)
        .with_body(r#"{"path": "images\\12.png"}"#)
        .create_async()
        .await;
    let tags = server
        .mock("GET", "/Tag/GetTagsOfPost/12")
        .with_status(200)
        .with_body(r#"[{"tagName": "rust"}]"#)
        .create_async()
        .await;

    assert_eq!(blog.get_blog_post_by_id("12").await.expect("post").title, "t");
    assert!(blog.get_posts_by_tag("rust").await.expect("tagged").is_empty());
    assert_eq!(
        blog.get_cover_image("12").await.expect("cover").path,
        r"images\12.png"
    );
    assert_eq!(
        blog.tag_service()
            .get_tags_of_post("12")
            .await
            .expect("tags")[0]
            .tag_name,
        "rust"
    );

    by_id.assert_async().await;
    by_tag.assert_async().await;
    cover.assert_async().await;
    tags.assert_async().await;
}

#[tokio::test]
async fn test_route_segments_are_encoded() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let csharp = server
        .mock("GET", "/Post/GetPostsByTag/c%23")
        .with_status(200)
        .with_body(r#"[{"id": 3, "title": "Async in C#", "content": ""}]"#)
        .create_async()
        .await;
    let slashed = server
        .mock("GET", "/Post/GetPostsByTag/ci%2Fcd")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let posts = blog.get_posts_by_tag("c#").await.expect("tagged");
    assert_eq!(posts[0].title, "Async in C#");
    assert!(blog.get_posts_by_tag("ci/cd").await.expect("tagged").is_empty());

    csharp.assert_async().await;
    slashed.assert_async().await;
}

#[tokio::test]
async fn test_mutations_carry_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, session) = services(&server);
    session.set_token("tok").expect("store works");

    let create = server
        .mock("POST", "/Post/Upload")
        .match_header("authorization", "Bearer tok")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "title": "T",
            "content": "<p>c</p>",
            "isPublished": true
        })))
        .with_status(200)
        .with_body(r#"{"succeeded": true, "message": "ok", "id": 5}"#)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/Post/Update")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(serde_json::json!({"id": 5, "title": "New"})))
        .with_status(200)
        .with_body(r#"{"id": 5, "title": "New", "content": ""}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/Post/5")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .create_async()
        .await;

    let response = blog
        .create_blog_post(&CreateBlogPostRequest {
            title: "T".to_string(),
            content: "<p>c</p>".to_string(),
            is_published: true,
            ..Default::default()
        })
        .await
        .expect("create");
    assert!(response.succeeded);
    assert_eq!(response.id, Some(Identifier::Number(5)));

    let mut update_request = UpdateBlogPostRequest::new(5i64);
    update_request.title = Some("New".to_string());
    assert_eq!(
        blog.update_blog_post(&update_request).await.expect("update").title,
        "New"
    );

    assert_eq!(blog.delete_blog_post("5").await.expect("delete"), None);

    create.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_reads_are_anonymous() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, session) = services(&server);
    session.set_token("tok").expect("store works");

    let mock = server
        .mock("GET", "/Post/GetTop/1")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    blog.get_top_posts(1).await.expect("top");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_save_as_draft_forces_unpublished() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let mock = server
        .mock("POST", "/Post/SaveDraft")
        .match_body(Matcher::PartialJson(serde_json::json!({"isPublished": false})))
        .with_status(200)
        .with_body(r#"{"succeeded": true, "message": "saved"}"#)
        .create_async()
        .await;

    let response = blog
        .save_as_draft(&CreateBlogPostRequest {
            title: "Draft".to_string(),
            is_published: true,
            ..Default::default()
        })
        .await
        .expect("draft");
    assert_eq!(response.message.as_deref(), Some("saved"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_empty_post_body() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let mock = server
        .mock("POST", "/Post/Upload")
        .match_body(Matcher::Json(serde_json::json!({
            "title": "",
            "content": "",
            "authorId": "u-1",
            "isPublished": false
        })))
        .with_status(200)
        .with_body(r#"{"succeeded": true, "message": "", "id": 42}"#)
        .create_async()
        .await;

    let response = blog.create_empty_post("u-1").await.expect("empty post");
    assert_eq!(response.id, Some(Identifier::Number(42)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_image_form_fields() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let with_id = server
        .mock("POST", "/Post/UploadImage")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="File"; filename="a.png""#.to_string()),
            Matcher::Regex(r#"name="IsFeaturedImage"\r\n\r\ntrue"#.to_string()),
            Matcher::Regex(r#"name="Id"\r\n\r\n7"#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"pathOrContainer": "images/a.png"}"#)
        .create_async()
        .await;

    let file = FilePart::new(b"PNG".to_vec())
        .with_file_name("a.png")
        .with_mime_type("image/png");
    let response = blog
        .upload_image(file, true, Some("7"))
        .await
        .expect("upload");
    assert_eq!(response.path_or_container.as_deref(), Some("images/a.png"));
    with_id.assert_async().await;

    let without_id = server
        .mock("POST", "/Post/UploadImage")
        .match_body(Matcher::Regex(r#"name="IsFeaturedImage"\r\n\r\nfalse"#.to_string()))
        .with_status(200)
        .with_body(r#"{"pathOrContainer": "images/b.png"}"#)
        .create_async()
        .await;

    let response = blog
        .upload_image(FilePart::new(b"PNG".to_vec()), false, None)
        .await
        .expect("upload");
    assert_eq!(response.path_or_container.as_deref(), Some("images/b.png"));
    without_id.assert_async().await;
}

#[tokio::test]
async fn test_download_asset_returns_bytes() {
    let mut server = mockito::Server::new_async().await;
    let (blog, _, _, _) = services(&server);

    let body = vec![0x89u8, b'P', b'N', b'G', 0xff];
    let mock = server
        .mock("GET", "/images/a.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(body.clone())
        .create_async()
        .await;

    let bytes = blog
        .download_asset(&format!("{}/images/a.png", server.url()))
        .await
        .expect("download");
    assert_eq!(bytes, body);
    mock.assert_async().await;
}

// === Tags ===

#[tokio::test]
async fn test_tag_routes() {
    let mut server = mockito::Server::new_async().await;
    let (_, tags, _, session) = services(&server);
    session.set_token("tok").expect("store works");

    let list = server
        .mock("GET", "/Tag/GetTags")
        .with_status(200)
        .with_body(r#"[{"id": 1, "tagName": "rust"}, {"tagName": "web"}]"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/Tag/CreateTag")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(serde_json::json!({"tagName": "async"})))
        .with_status(200)
        .with_body(r#"{"succeeded": true}"#)
        .create_async()
        .await;
    let attach = server
        .mock("POST", "/Tag/AddTagsToPost")
        .match_body(Matcher::Json(serde_json::json!({
            "postId": 3,
            "tagNames": ["rust", "async"]
        })))
        .with_status(200)
        .create_async()
        .await;

    let all = tags.get_tags().await.expect("tags");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, Some(Identifier::Number(1)));

    let created = tags.create_tag("async").await.expect("create");
    assert_eq!(created.and_then(|r| r.succeeded), Some(true));

    let attached = tags
        .add_tags_to_post(&AddTagsToPostRequest {
            post_id: Identifier::Number(3),
            tag_names: vec!["rust".to_string(), "async".to_string()],
        })
        .await
        .expect("attach");
    assert_eq!(attached, None);

    list.assert_async().await;
    create.assert_async().await;
    attach.assert_async().await;
}

// === Auth ===

#[tokio::test]
async fn test_sign_in_stores_token_and_user_id() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, session) = services(&server);

    let mock = server
        .mock("POST", "/api/AppUser/LogIn")
        .match_body(Matcher::Json(serde_json::json!({
            "UsernameOrEmail": "ada",
            "password": "secret1"
        })))
        .with_status(200)
        .with_body(
            r#"{"succeeded": true,
                "token": {"accessToken": "tok-1", "expiration": "2030-01-01T00:00:00Z"},
                "user": {"id": "u-1", "userName": "ada"}}"#,
        )
        .create_async()
        .await;

    assert!(!auth.is_authenticated());
    let outcome = auth
        .sign_in(&LoginRequest::new("ada", "secret1"))
        .await
        .expect("login");

    assert!(auth.is_authenticated());
    assert_eq!(session.token().expect("read"), Some("tok-1".to_string()));
    assert_eq!(session.user_id().expect("read"), Some("u-1".to_string()));
    assert_eq!(outcome.expiration.as_deref(), Some("2030-01-01T00:00:00Z"));

    auth.logout().expect("logout");
    assert!(!auth.is_authenticated());
    assert_eq!(session.user_id().expect("read"), None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_sign_in_without_user_keeps_user_slot_empty() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, session) = services(&server);

    let mock = server
        .mock("POST", "/api/AppUser/LogIn")
        .with_status(200)
        .with_body(r#"{"succeeded": true, "token": {"accessToken": "tok-2", "expiration": "x"}}"#)
        .create_async()
        .await;

    auth.sign_in(&LoginRequest::new("ada", "secret1"))
        .await
        .expect("login");

    assert!(session.is_authenticated());
    assert_eq!(session.user_id().expect("read"), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_login_leaves_session_empty() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, session) = services(&server);

    let mock = server
        .mock("POST", "/api/AppUser/LogIn")
        .with_status(200)
        .with_body(r#"{"succeeded": false}"#)
        .create_async()
        .await;

    let result = auth.sign_in(&LoginRequest::new("ada", "wrong")).await;
    match result {
        Err(Error::Rejected(message)) => {
            assert_eq!(message, "Login failed. Please check your credentials.")
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
    assert!(!session.is_authenticated());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_server_error_is_retried_once() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, session) = services(&server);

    let mock = server
        .mock("POST", "/api/AppUser/LogIn")
        .with_status(500)
        .with_body("down")
        .expect(2)
        .create_async()
        .await;

    let result = auth.sign_in(&LoginRequest::new("ada", "secret1")).await;
    assert!(matches!(result, Err(Error::Http(_))));
    assert!(!session.is_authenticated());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_login_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, _) = services(&server);

    let mock = server
        .mock("POST", "/api/AppUser/LogIn")
        .expect(0)
        .create_async()
        .await;

    let result = auth.sign_in(&LoginRequest::new("ada", "")).await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sign_up() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, session) = services(&server);

    let ok = server
        .mock("POST", "/api/AppUser/Register")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "NameSurname": "Ada Lovelace",
            "Username": "ada",
            "Email": "ada@example.com"
        })))
        .with_status(200)
        .with_body(r#"{"succeeded": true, "message": "welcome"}"#)
        .create_async()
        .await;

    let response = auth.sign_up(&register_request()).await.expect("register");
    assert_eq!(response.message.as_deref(), Some("welcome"));
    assert!(!session.is_authenticated());
    ok.assert_async().await;
}

#[tokio::test]
async fn test_sign_up_rejection_surfaces_message() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, _) = services(&server);

    let mock = server
        .mock("POST", "/api/AppUser/Register")
        .with_status(200)
        .with_body(r#"{"succeeded": false, "message": "Username taken"}"#)
        .create_async()
        .await;

    match auth.sign_up(&register_request()).await {
        Err(Error::Rejected(message)) => assert_eq!(message, "Username taken"),
        other => panic!("Expected rejection, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sign_up_validation_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let (_, _, auth, _) = services(&server);

    let mock = server
        .mock("POST", "/api/AppUser/Register")
        .expect(0)
        .create_async()
        .await;

    let mut request = register_request();
    request.password_confirm = "other12".to_string();
    assert!(matches!(
        auth.sign_up(&request).await,
        Err(Error::Validation(ValidationError::PasswordMismatch))
    ));
    mock.assert_async().await;
}
