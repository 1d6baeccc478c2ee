use anyhow::Result;
use ark_blog::api::AuthService;

pub fn logout(auth: &AuthService) -> Result<()> {
    auth.logout()?;
    println!("Logged out");
    Ok(())
}
