use anyhow::Result;
use ark_blog::api::AuthService;
use ark_blog::types::LoginRequest;
use clap::Args;

use crate::utils::value_or_prompt;

#[derive(Args)]
pub struct LoginSubCommand {
    /// Username or email
    #[arg(short, long)]
    username: Option<String>,
    /// Password
    #[arg(short, long, env = "ARK_BLOG_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

pub async fn login(auth: &AuthService, sub_command_args: &LoginSubCommand) -> Result<()> {
    let username = value_or_prompt(
        sub_command_args.username.as_deref(),
        "Enter username or email",
    )?;
    let password = value_or_prompt(sub_command_args.password.as_deref(), "Enter password")?;

    let outcome = auth
        .sign_in(&LoginRequest::new(username.clone(), password))
        .await?;

    let name = outcome
        .user
        .as_ref()
        .and_then(|user| user.name_surname.as_deref().or(user.user_name.as_deref()))
        .unwrap_or(&username);
    println!("Logged in as {}", name);

    if let Some(expiration) = outcome.expiration {
        println!("Session expires {}", expiration);
    }

    Ok(())
}
