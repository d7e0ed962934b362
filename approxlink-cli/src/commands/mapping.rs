//! Mapping inspection commands.

use approxlink::exchange::{DataFile, ExchangeDirectory};
use approxlink::mapping::{
    DataDefinition, DataSchema, Direction, MappingDefinition, MappingElement,
};
use clap::Subcommand;

use super::common::GlobalOptions;
use crate::error::CliError;

/// Mapping subcommands.
#[derive(Debug, Subcommand)]
pub enum MappingCommands {
    /// Check the mapping definition against the model's data definition
    ///
    /// Prints every element with the original entry it points at, then runs
    /// the consistency checks the mapping enables.
    Check,
}

/// Run a mapping subcommand.
pub fn run(options: &GlobalOptions, command: MappingCommands) -> Result<(), CliError> {
    match command {
        MappingCommands::Check => run_check(options),
    }
}

fn run_check(options: &GlobalOptions) -> Result<(), CliError> {
    let config = options.load_config()?;
    let directory = ExchangeDirectory::open(&config.exchange.directory, config.exchange.files)?;

    let mapping_path = directory.path(DataFile::MappingDefinition);
    let data_path = directory.path(DataFile::DataDefinition);
    let mapping = MappingDefinition::load(&mapping_path)?;
    let schema = DataSchema::load(&data_path)?;

    println!("Mapping:         {}", mapping_path.display());
    println!("Data definition: {}", data_path.display());
    println!();

    print_elements("Inputs", mapping.inputs(), &schema);
    println!();
    print_elements("Outputs", mapping.outputs(), &schema);
    println!();

    let checks = mapping.checks();
    println!(
        "Checks: input uniqueness {}, output uniqueness {}, input names {}, output names {}",
        on_off(checks.input_uniqueness),
        on_off(checks.output_uniqueness),
        on_off(checks.input_name_consistency),
        on_off(checks.output_name_consistency),
    );

    mapping.validate_with(&schema)?;

    println!(
        "OK: {} of {} inputs and {} of {} outputs mapped",
        mapping.mapped_input_count(),
        schema.input_len(),
        mapping.mapped_output_count(),
        schema.output_len()
    );
    Ok(())
}

fn print_elements<D: Direction>(
    label: &str,
    elements: &[MappingElement<D>],
    data: &dyn DataDefinition,
) {
    println!("{} ({} elements)", label, elements.len());
    println!(
        "  {:>8} {:>8}  {:<20} data definition",
        "original", "mapped", "name"
    );
    for element in elements {
        let original = index_column(element.original_index());
        let mapped = index_column(element.mapped_index());
        let target = match element.original_index() {
            Some(i) => data
                .element(D::KIND, i)
                .map(|e| e.name)
                .unwrap_or_else(|| "(out of range)".to_string()),
            None => "(inactive)".to_string(),
        };
        println!(
            "  {:>8} {:>8}  {:<20} {}",
            original,
            mapped,
            element.name(),
            target
        );
    }
}

fn index_column(index: Option<usize>) -> String {
    index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
