use anyhow::Result;
use ark_blog::session::Session;

pub fn status(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }

    match session.user_id()? {
        Some(user_id) => println!("Logged in as {}", user_id),
        None => println!("Logged in"),
    }

    Ok(())
}
