//! A five-page space voyage: synthesized passages, probed illustrations.
//!
//! Run with `RUST_LOG=storybook_engine=debug` to watch staging and probing.

use storybook_engine::schema::page::PageRequest;
use storybook_engine::schema::story::StoryMeta;
use storybook_engine::{GenerationBatch, StoryService, StorybookConfig, WritingMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let meta = StoryMeta {
        title: "별을 찾아서".to_string(),
        hero: "토르".to_string(),
        genre: "모험".to_string(),
        world: "우주".to_string(),
        theme: "용기".to_string(),
    };
    let batch = GenerationBatch::new(
        meta,
        vec![
            PageRequest::new(0, &["로켓", "별"]),
            PageRequest::new(1, &["달", "토끼"]),
            PageRequest::new(2, &["블랙홀"]),
            PageRequest::new(3, &["혜성", "친구", "지도"]),
            PageRequest::new(4, &["지구"]),
        ],
    )?;

    let service = StoryService::from_config(StorybookConfig::default())?;
    let pages = service
        .write_and_illustrate(&batch, WritingMode::ExternalWithFallback, "수채화 파스텔")
        .await?;

    for page in pages {
        println!("[{}] {}\n    {}\n", page.index, page.text, page.image_url);
    }
    Ok(())
}
