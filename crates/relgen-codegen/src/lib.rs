mod backend;
mod columns;
mod context;
mod element;
mod header;
mod source;
mod writer;

use context::Context;

use relgen_core::{Mapping, Options, Result, SchemaFormat, Unit};
use relgen_sql::SchemaGenerator;

/// The files generated for one translation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Traits declarations, `<stem>-odb.hxx`
    pub header: String,

    /// Traits definitions, `<stem>-odb.cxx`
    pub source: String,

    /// Standalone schema, `<stem>.sql`. Only produced when the schema is
    /// generated as a separate file.
    pub schema: Option<String>,
}

/// Generates persistence code for every persistent class defined in `unit`.
///
/// Options are checked before anything is generated, so a configuration
/// error never leaves partial output behind.
pub fn generate(unit: &Unit, options: &Options) -> Result<Output> {
    options.verify(unit)?;
    unit.verify()?;

    let mapping = Mapping::build(unit, options)?;
    let cx = Context::new(unit, options, &mapping);

    log::debug!("generating {} for {}", cx.stem(), options.db());

    let header = header::generate(&cx)?;
    let source = source::generate(&cx)?;

    let schema = if options.generate_schema && options.schema_format == SchemaFormat::Sql {
        Some(SchemaGenerator::new(unit, &mapping, options.db())?.sql())
    } else {
        None
    };

    Ok(Output {
        header,
        source,
        schema,
    })
}

/// Base name shared by the generated files, e.g. `person` for
/// `include/person.hxx`.
pub fn stem(unit: &Unit) -> &str {
    let file = unit.file.rsplit(['/', '\\']).next().unwrap_or(&unit.file);

    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    }
}
