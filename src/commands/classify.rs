use anyhow::{Result, bail};

use crate::cli::ClassifyArgs;
use crate::query_classifier::classify_query;
use crate::url_classifier::classify_url;

/// One-off classification for debugging rule behavior against live URLs
/// and queries. Prints the classification as JSON on stdout; logs stay
/// on stderr so the output pipes cleanly.
pub fn run(args: ClassifyArgs) -> Result<()> {
    match (args.url, args.query) {
        (Some(url), None) => {
            let classification = classify_url(&url, &args.category);
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        (None, Some(query)) => {
            let classification = classify_query(&query);
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        _ => bail!("provide exactly one of --url or --query"),
    }

    Ok(())
}
