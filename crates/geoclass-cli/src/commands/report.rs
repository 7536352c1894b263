//! Human-readable rendering of analysis results.

use colored::Colorize;
use geoclass::input::find_by_aperture;
use geoclass::{AnalysisResult, GradationParameters, SieveCurve, Severity};

/// Format an optional value, or a dash when undefined.
pub fn optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

/// Print the curve as a table, coarsest sieve first.
pub fn print_curve(curve: &SieveCurve) {
    println!("{}", "Curve:".yellow().bold());
    println!("  {:>10}  {:>8}  {:>9}", "mm", "sieve", "% passing");
    for point in curve.points().iter().rev() {
        let designation = find_by_aperture(point.aperture_mm)
            .map(|s| s.designation)
            .unwrap_or("");
        println!(
            "  {:>10.3}  {:>8}  {:>9.2}",
            point.aperture_mm, designation, point.percent_passing
        );
    }

    if let Some(balance) = curve.mass_balance() {
        let line = format!(
            "  Mass balance: {:.2} g of {:.2} g ({:+.2}%)",
            balance.retained_total_g, balance.declared_total_g, balance.deviation_percent
        );
        if balance.within_tolerance {
            println!("{}", line);
        } else {
            println!("{}", line.yellow());
        }
    }
}

/// Print D10/D30/D60 and Cu/Cc.
pub fn print_gradation(gradation: &GradationParameters) {
    println!("{}", "Gradation:".yellow().bold());
    println!(
        "  D10 {}  D30 {}  D60 {} mm",
        optional(gradation.d10, 4),
        optional(gradation.d30, 4),
        optional(gradation.d60, 4)
    );
    println!(
        "  Cu {}  Cc {}",
        optional(gradation.cu, 2),
        optional(gradation.cc, 2)
    );
}

/// Print a full analysis result.
pub fn print_result(result: &AnalysisResult, verbose: bool) {
    let classification = &result.classification;

    if let Some(source) = &result.source {
        println!(
            "{} {}",
            "Classification for".cyan().bold(),
            source.file.white()
        );
        println!();
    }

    println!(
        "  SUCS:   {:<20} {}",
        classification.sucs_symbol.white().bold(),
        classification.explanations.sucs.dimmed()
    );
    println!(
        "  AASHTO: {:<20} {}",
        classification.aashto.to_string().white().bold(),
        classification.explanations.aashto.dimmed()
    );
    println!(
        "  MCT:    {:<20} {}",
        classification.mct_class.white().bold(),
        classification.explanations.mct.dimmed()
    );
    println!();

    println!(
        "Fractions: gravel {:.1}%, sand {:.1}%, fines {:.1}%",
        result.fractions.gravel, result.fractions.sand, result.fractions.fines
    );
    println!(
        "Limits: LL {:.1}, LP {:.1}, IP {:.1}",
        result.limits.ll,
        result.limits.lp,
        result.limits.ip_eff()
    );
    println!();

    if verbose {
        print_curve(&result.curve);
        println!();
        print_gradation(&result.gradation);
        println!();

        println!("{}", "Rules:".yellow().bold());
        println!("  AASHTO: {}", classification.aashto.rule);
        if let geoclass::classify::SucsOutcome::Classified { rules, .. } = &classification.sucs {
            println!("  SUCS:   {}", rules.join("; "));
        }
        if let geoclass::classify::MctOutcome::Classified { rule, .. } = &classification.mct {
            println!("  MCT:    {}", rule);
        }
        println!();
    }

    let counts = &result.summary.notices_by_severity;
    println!(
        "Found {} notices ({} warnings, {} info)",
        result.summary.total_notices.to_string().white().bold(),
        counts.warning.to_string().yellow(),
        counts.info.to_string().blue()
    );
    for notice in &result.notices {
        let label = match notice.severity {
            Severity::Warning => notice.kind.label().yellow(),
            Severity::Info => notice.kind.label().blue(),
        };
        println!("  [{}] {}", label, notice.description);
    }
    println!();

    println!("{} {}", "Recommendation:".cyan().bold(), result.summary.recommendation);
}
