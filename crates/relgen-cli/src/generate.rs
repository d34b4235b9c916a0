use crate::Config;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use relgen_core::{Database, Options, SchemaFormat, Unit};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Translation unit, as JSON produced by the front end
    input: PathBuf,

    /// Database the generated code targets
    #[arg(short, long, value_enum)]
    database: Option<DatabaseArg>,

    /// Generate query columns and query functions
    #[arg(short = 'q', long)]
    generate_query: bool,

    /// Generate the database schema
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    generate_schema: bool,

    /// Where the generated schema goes
    #[arg(long, value_enum, default_value_t = SchemaFormatArg::Sql)]
    schema_format: SchemaFormatArg,

    /// Prefix all table names with this string
    #[arg(long)]
    table_prefix: Option<String>,

    /// Directory the generated files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DatabaseArg {
    Mysql,
    Sqlite,
    Pgsql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemaFormatArg {
    Embedded,
    Sql,
}

impl GenerateCommand {
    /// Generation options selected on the command line
    pub fn options(&self) -> Options {
        let mut options = Options::new()
            .generate_query(self.generate_query)
            .generate_schema(self.generate_schema)
            .schema_format(self.schema_format.into());

        if let Some(database) = self.database {
            options = options.database(database.into());
        }

        if let Some(prefix) = &self.table_prefix {
            options = options.table_prefix(prefix);
        }

        options
    }

    /// Generates the files for the input unit and returns their paths.
    pub fn run(&self, config: &Config) -> Result<Vec<PathBuf>> {
        let text = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let unit: Unit = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a valid translation unit", self.input.display()))?;

        let options = self.options();
        let output = relgen_codegen::generate(&unit, &options)
            .with_context(|| format!("failed to generate code for {}", unit.file))?;

        let dir = self.output_dir(config);
        let stem = relgen_codegen::stem(&unit);

        let mut files = vec![
            (dir.join(format!("{stem}-odb.hxx")), output.header),
            (dir.join(format!("{stem}-odb.cxx")), output.source),
        ];

        if let Some(schema) = output.schema {
            files.push((dir.join(format!("{stem}.sql")), schema));
        }

        let mut written = Vec::with_capacity(files.len());

        for (path, contents) in files {
            log::info!("writing {}", path.display());
            std::fs::write(&path, contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            written.push(path);
        }

        Ok(written)
    }

    fn output_dir(&self, config: &Config) -> PathBuf {
        if let Some(dir) = self.output_dir.as_ref().or(config.output_dir.as_ref()) {
            return dir.clone();
        }

        match self.input.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl From<DatabaseArg> for Database {
    fn from(value: DatabaseArg) -> Self {
        match value {
            DatabaseArg::Mysql => Database::Mysql,
            DatabaseArg::Sqlite => Database::Sqlite,
            DatabaseArg::Pgsql => Database::Pgsql,
        }
    }
}

impl From<SchemaFormatArg> for SchemaFormat {
    fn from(value: SchemaFormatArg) -> Self {
        match value {
            SchemaFormatArg::Embedded => SchemaFormat::Embedded,
            SchemaFormatArg::Sql => SchemaFormat::Sql,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> GenerateCommand {
        GenerateCommand::try_parse_from(std::iter::once("generate").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_match_the_library() {
        let cmd = parse(&["person.json"]);
        assert_eq!(cmd.options(), Options::new());
    }

    #[test]
    fn flags_map_to_options() {
        let cmd = parse(&[
            "person.json",
            "--database",
            "pgsql",
            "-q",
            "--schema-format",
            "embedded",
            "--table-prefix",
            "app_",
        ]);

        assert_eq!(
            cmd.options(),
            Options::new()
                .database(Database::Pgsql)
                .generate_query(true)
                .schema_format(SchemaFormat::Embedded)
                .table_prefix("app_")
        );
    }

    #[test]
    fn schema_generation_can_be_turned_off() {
        let cmd = parse(&["person.json", "--generate-schema", "false"]);
        assert!(!cmd.options().generate_schema);
    }

    #[test]
    fn output_defaults_to_the_input_directory() {
        let config = Config::new();

        assert_eq!(parse(&["model/person.json"]).output_dir(&config), PathBuf::from("model"));
        assert_eq!(parse(&["person.json"]).output_dir(&config), PathBuf::from("."));

        let config = Config::new().output_dir("gen");
        assert_eq!(parse(&["model/person.json"]).output_dir(&config), PathBuf::from("gen"));
        assert_eq!(
            parse(&["person.json", "-o", "out"]).output_dir(&config),
            PathBuf::from("out")
        );
    }
}
