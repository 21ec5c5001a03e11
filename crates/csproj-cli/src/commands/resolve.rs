//! Resolve command

use std::path::Path;

use crate::context::Context;
use crate::error::Result;

pub fn run_resolve(ctx: &Context, file: &Path) -> Result<()> {
    let file = ctx.absolute(file)?;
    let engine = ctx.engine()?;
    let scope = engine.resolve(&file)?;
    ctx.printer.scope(&file, &scope);
    Ok(())
}
