//! Index page handler.

use super::{GlobalOptions, load_book};
use annals::AnnalsResult;
use tracing::instrument;

/// Rebuilds the index page. Needs no API key.
#[instrument(skip(options))]
pub async fn update_main_readme(options: &GlobalOptions) -> AnnalsResult<()> {
    let book = load_book(options).await?;
    let summary = book.update_index().await?;

    let state = if *summary.changed() {
        "updated"
    } else {
        "unchanged"
    };
    println!(
        "✅ {} {} ({}/{} chapters generated)",
        summary.path().display(),
        state,
        summary.generated(),
        summary.total()
    );
    Ok(())
}
