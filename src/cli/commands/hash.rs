//! Hash command - print an MD5 digest

use crate::cli::args::HashArgs;
use crate::error::{OtaError, OtaResult};
use crate::hash;

/// Execute the hash command
pub async fn execute(args: HashArgs) -> OtaResult<()> {
    let digest = match (args.file, args.text) {
        (Some(path), _) => hash::try_hash_file(&path)
            .map_err(|e| OtaError::io(format!("hashing {}", path.display()), e))?,
        (None, Some(text)) => hash::hash_string(&text),
        (None, None) => return Err(OtaError::Internal("nothing to hash".to_string())),
    };

    println!("{}", digest);
    Ok(())
}
