//! Print a sequence of numbers: `seq 10`, `seq 2:10`, `seq 10:0:-3`.

use clap_gears::types::ArgRange;
use clap_gears::{ArgumentParser, Decl};

fn main() -> anyhow::Result<()> {
    let mut parser = ArgumentParser::new("seq").about("Print a sequence of numbers");
    parser.add_positional(Decl::from("seq").with_type("range"))?;
    let args = parser.parse();

    for i in args.one::<ArgRange>("seq")? {
        println!("{i}");
    }
    Ok(())
}
