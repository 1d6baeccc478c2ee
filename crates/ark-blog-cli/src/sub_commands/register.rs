use anyhow::Result;
use ark_blog::api::AuthService;
use ark_blog::types::RegisterRequest;
use clap::Args;

use crate::utils::value_or_prompt;

#[derive(Args)]
pub struct RegisterSubCommand {
    /// Full name
    #[arg(short, long)]
    name: String,
    /// Username
    #[arg(short, long)]
    username: String,
    /// Email
    #[arg(short, long)]
    email: String,
    /// Password
    #[arg(short, long, env = "ARK_BLOG_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Password confirmation, prompted for when omitted
    #[arg(long)]
    password_confirm: Option<String>,
}

pub async fn register(auth: &AuthService, sub_command_args: &RegisterSubCommand) -> Result<()> {
    let password = value_or_prompt(sub_command_args.password.as_deref(), "Enter password")?;
    let password_confirm = value_or_prompt(
        sub_command_args.password_confirm.as_deref(),
        "Confirm password",
    )?;

    let request = RegisterRequest {
        name_surname: sub_command_args.name.clone(),
        username: sub_command_args.username.clone(),
        email: sub_command_args.email.clone(),
        password,
        password_confirm,
    };

    let response = auth.sign_up(&request).await?;
    println!(
        "{}",
        response
            .message
            .unwrap_or_else(|| "Registration successful".to_string())
    );
    println!("Log in with `ark-blog login -u {}`", request.username);

    Ok(())
}
