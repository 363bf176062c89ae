//! `modrules resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use modrules::resolve;
use modrules::util::config::OutputFormat;

pub fn execute(args: ResolveArgs) -> Result<()> {
    let (manifest, config, context) = super::load_with_context(&args.context)?;

    let descriptor = resolve(&manifest.declaration, &context)?;

    match config.output_format(args.format) {
        OutputFormat::Json => println!("{}", descriptor.to_json()?),
        OutputFormat::Toml => print!("{}", descriptor.to_toml()?),
    }

    Ok(())
}
