//! Author and tag listings

use anyhow::Result;

use lynx_core::Store;

use crate::output::Output;

/// List unique authors in first-seen order
pub fn authors(store: &Store, output: &Output) -> Result<()> {
    output.print_names("author", &store.compile_authors());
    Ok(())
}

/// List unique tags in first-seen order
pub fn tags(store: &Store, output: &Output) -> Result<()> {
    output.print_names("tag", &store.compile_tags());
    Ok(())
}
