//! `modrules flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use modrules::resolve;

pub fn execute(args: FlagsArgs) -> Result<()> {
    let (manifest, _config, context) = super::load_with_context(&args.context)?;

    let descriptor = resolve(&manifest.declaration, &context)?;

    let flags: Vec<String> = descriptor
        .include_flags()
        .into_iter()
        .chain(descriptor.definition_flags())
        .chain(descriptor.compile_switches())
        .collect();

    if args.one_line {
        println!("{}", flags.join(" "));
        return Ok(());
    }

    println!("# Compile flags for `{}` under {}:", descriptor.module(), context);
    for flag in &flags {
        println!("  {}", flag);
    }

    Ok(())
}
