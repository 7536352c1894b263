//! Show command - display a saved analysis result.

use std::path::PathBuf;

use geoclass::AnalysisResult;

use super::report;

pub fn run(
    file: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!(
            "Result file not found: {}\nRun 'geoclass classify <FILE> --output {}' first.",
            file.display(),
            file.display()
        )
        .into());
    }

    let result = AnalysisResult::load(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::print_result(&result, verbose);
    }

    Ok(())
}
