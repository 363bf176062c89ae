//! `modrules explain` command

use anyhow::Result;

use crate::cli::ExplainArgs;
use modrules::resolver::explain;

pub fn execute(args: ExplainArgs) -> Result<()> {
    let (manifest, _config, context) = super::load_with_context(&args.context)?;

    let explanation = explain(&manifest.declaration, &context);
    print!("{}", explanation.render());

    // Non-zero exit when resolution failed
    explanation.result?;

    Ok(())
}
