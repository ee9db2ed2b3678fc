use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("savestate {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: savestate");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SAVESTATE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("slot_bits: {}", savestate_buffer::SLOT_BITS);
    println!(
        "types: {}",
        savestate_codec::TypeTag::ALL
            .iter()
            .map(|tag| tag.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "features: sequencer={}, cli=true",
        cfg!(feature = "sequencer")
    );

    Ok(SUCCESS)
}
