use anyhow::Result;
use ark_blog::api::TagService;
use ark_blog::feed::TagCatalog;

pub async fn tags(service: TagService) -> Result<()> {
    let catalog = TagCatalog::new(service);

    let tags = catalog.tags().await?;
    if tags.is_empty() {
        println!("No tags");
    }
    for tag in tags {
        match &tag.id {
            Some(id) => println!("{}: {}", id, tag.tag_name),
            None => println!("{}", tag.tag_name),
        }
    }

    Ok(())
}
