use temario_core::load_tree;
use temario_validate::TreeValidator;

use crate::markdown;
use crate::ValidateArgs;

const MAX_PRINTED_FINDINGS: usize = 200;

pub fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let config = super::load_config(args.config.as_deref())?;
    let tree = load_tree(&args.themes).map_err(|e| e.to_string())?;

    let report = TreeValidator::new(config).run(&tree);
    let generated_at = super::now_utc_rfc3339();

    if args.json {
        let payload = serde_json::json!({
            "command": "validate",
            "themes": args.themes.to_string_lossy(),
            "generated_at": generated_at,
            "passed": report.passed(),
            "report": &report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(|e| format!("json encode: {}", e))?
        );
    } else {
        println!("themes={}", args.themes.display());
        println!("l1={}", report.counts.l1);
        println!("l2={}", report.counts.l2);
        println!("l3={}", report.counts.l3);
        println!("total_nodes={}", report.counts.total());
        println!("errors={}", report.error_count());
        println!("warnings={}", report.warning_count());
        println!("passed={}", report.passed());

        for finding in report.findings.iter().take(MAX_PRINTED_FINDINGS) {
            let code = if finding.code.is_empty() {
                "-"
            } else {
                finding.code.as_str()
            };
            println!(
                "finding rule_id={} severity={} code={} message={}",
                finding.rule_id, finding.severity, code, finding.message
            );
        }
        if report.findings.len() > MAX_PRINTED_FINDINGS {
            println!(
                "findings_truncated=true shown={} total={}",
                MAX_PRINTED_FINDINGS,
                report.findings.len()
            );
        }
    }

    if let Some(out) = &args.out {
        let md =
            markdown::render_validation(&report, &args.themes.to_string_lossy(), &generated_at);
        std::fs::write(out, md).map_err(|e| format!("write {}: {}", out.display(), e))?;
        if !args.json {
            println!("report={}", out.display());
        }
    }

    if report.passed() {
        Ok(())
    } else {
        Err(format!(
            "validation found {} error(s)",
            report.error_count()
        ))
    }
}
