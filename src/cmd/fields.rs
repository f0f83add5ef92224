use anyhow::Result;

use crate::cli::FieldsOpts;
use rtkstr::proto::{FieldSpec, InputClass, fields_for};

pub fn run(opts: FieldsOpts) -> Result<()> {
    let specs = fields_for(opts.kind);
    if specs.is_empty() {
        println!("{}: no fields, the string is stored as is", opts.kind);
        return Ok(());
    }
    for spec in specs {
        println!("{}", spec_line(spec));
    }
    Ok(())
}

fn spec_line(spec: &FieldSpec) -> String {
    let input = match spec.input {
        InputClass::Text => "text",
        InputClass::Numeric => "number",
        InputClass::Password => "password",
    };
    format!("{:<10}{:<10}{}", spec.field.as_str(), input, spec.placeholder())
}
