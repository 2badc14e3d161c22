//! Copy a file. The destination is only created once something is written
//! to it.

use std::io::{Read, Write};

use clap_gears::types::{lazy_file, FileMode, LazyFile};
use clap_gears::{ArgumentParser, Decl};

fn main() -> anyhow::Result<()> {
    let mut parser = ArgumentParser::new("copyfile").about("Copy a file");
    parser.add_positional(Decl::from("src").spec(lazy_file("rb".parse::<FileMode>()?)))?;
    parser.add_positional(Decl::from("dest").spec(lazy_file("wb".parse::<FileMode>()?)))?;
    let mut args = parser.parse();

    let mut src = args
        .take_one::<LazyFile>("src")?
        .ok_or_else(|| anyhow::anyhow!("missing source file"))?;
    let mut dest = args
        .take_one::<LazyFile>("dest")?
        .ok_or_else(|| anyhow::anyhow!("missing destination file"))?;

    let mut contents = Vec::new();
    src.read_to_end(&mut contents)?;
    dest.write_all(&contents)?;
    dest.flush()?;
    Ok(())
}
