//! Concatenate files and print them on the standard output.

use clap_gears::types::{file_input, FileInput};
use clap_gears::{ArgumentParser, Decl, Nargs};

fn main() -> anyhow::Result<()> {
    let mut parser =
        ArgumentParser::new("cat").about("Concatenate files and print on the standard output");
    parser.add_positional(Decl::new().spec(file_input()).nargs(Nargs::ZeroOrMore))?;
    let mut args = parser.parse();

    let Some(lines) = args.take_one::<FileInput>("infiles")? else {
        return Ok(());
    };
    for line in lines {
        println!("{}", line?);
    }
    Ok(())
}
