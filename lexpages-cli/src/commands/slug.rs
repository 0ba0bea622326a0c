//! Label preview

use anyhow::Result;
use clap::Parser;

use lexpages_core::label::{is_valid, slugify};

#[derive(Parser, Debug)]
pub struct SlugArgs {
    /// Page name, e.g. "Семейный юрист"
    #[arg(required = true)]
    pub name: Vec<String>,
}

/// Print the label candidate for a name. Uniqueness is only checked by
/// the admin API, which can see the stored pages.
pub fn run_slug(args: SlugArgs) -> Result<()> {
    let name = args.name.join(" ");
    let label = slugify(&name);
    if !is_valid(&label) {
        anyhow::bail!("'{name}' gives no usable label");
    }
    println!("{label}");
    Ok(())
}
