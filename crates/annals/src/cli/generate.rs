//! Chapter generation and inspection handlers.

use super::{GlobalOptions, load_book};
use annals::{AnnalsResult, ChapterGenerator, ProcessEnv};
use tracing::{info, instrument};

/// Generates one chapter, optionally refreshing the index afterwards.
///
/// The API key is resolved before anything else touches the network.
#[instrument(skip(options))]
pub async fn generate_chapter(
    options: &GlobalOptions,
    chapter: Option<u32>,
    update_index: bool,
) -> AnnalsResult<()> {
    let book = load_book(options).await?;
    let generator = ChapterGenerator::from_config(book, &ProcessEnv)?;

    let generated = generator.generate(chapter).await?;
    println!(
        "✅ Chapter {} \"{}\" written to {}",
        generated.number(),
        generated.title(),
        generated.path().display()
    );
    if *generated.unresolved_placeholders() > 0 {
        println!(
            "   {} image placeholder(s) left unresolved",
            generated.unresolved_placeholders()
        );
    }
    if let Some(usage) = generated.usage() {
        info!(total_tokens = usage.total_tokens(), "Token usage");
    }

    if update_index {
        let summary = generator.book().update_index().await?;
        println!(
            "✅ Index {} updated ({}/{} chapters)",
            summary.path().display(),
            summary.generated(),
            summary.total()
        );
    }
    Ok(())
}

/// Prints the chapter the next run would generate.
#[instrument(skip(options))]
pub async fn show_next(options: &GlobalOptions) -> AnnalsResult<()> {
    let book = load_book(options).await?;
    let snapshot = book.snapshot().await?;
    let chapter = book.select(None, &snapshot)?;
    println!("{}\t{}\t{}", chapter.number(), chapter.title(), chapter.period());
    Ok(())
}

/// Prints the rendered prompt pair.
#[instrument(skip(options))]
pub async fn show_prompt(
    options: &GlobalOptions,
    chapter: Option<u32>,
    json: bool,
) -> AnnalsResult<()> {
    let book = load_book(options).await?;
    let snapshot = book.snapshot().await?;
    let spec = book.select(chapter, &snapshot)?;
    if json {
        println!("{}", book.request_json(spec)?);
    } else {
        let prompt = book.prompt_for(spec)?;
        println!("=== system ===\n{}\n", prompt.system());
        println!("=== user ===\n{}", prompt.user());
    }
    Ok(())
}
