//!
//! oidctl
//! ------
//! Diagnostic tool for object identifiers. Each input is either a bare value
//! (checked and normalized) or a JSON identity document such as a decoded token
//! payload or a user row (identifier extracted under the configured policy).
//! Inputs come from the command line or, when none are given, stdin, one per line.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use identity_normalizer::config::{parse_field_list, IdentityConfig};
use identity_normalizer::{locate, mask_for_logging, normalize, validate, ExtractionPolicy};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file.json>] [--fields oid,sub,id] [--reveal] [--strict] [<value-or-json> ...]\n\nWith no positional inputs, lines are read from stdin.\n\nOptions:\n  --config <file>   JSON IdentityConfig (defaults, then file, then OID_FIELDS / OID_RECORD_FIELDS env)\n  --fields <list>   override the token field priority for this run\n  --reveal          print full canonical identifiers instead of masked ones (the only way to disable masking)\n  --strict          exit non-zero if any input has no usable identifier\n\nExamples:\n  {program} A1B2C3D4-E5F6-7890-ABCD-EF1234567890\n  {program} '{{\"oid\":\"not-a-guid\",\"sub\":\"a1b2c3d4-e5f6-7890-abcd-ef1234567890\"}}'"
    );
}

struct Args {
    config: Option<PathBuf>,
    fields: Option<String>,
    reveal: bool,
    strict: bool,
    inputs: Vec<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<Option<Args>> {
    let mut it = argv.into_iter();
    let program = it.next().unwrap_or_else(|| "oidctl".to_string());
    let mut args = Args { config: None, fields: None, reveal: false, strict: false, inputs: Vec::new() };
    while let Some(a) = it.next() {
        match a.as_str() {
            "-h" | "--help" => { print_usage(&program); return Ok(None); }
            "--config" => args.config = Some(it.next().ok_or_else(|| anyhow!("--config needs a path"))?.into()),
            "--fields" => args.fields = Some(it.next().ok_or_else(|| anyhow!("--fields needs a list"))?),
            "--reveal" => args.reveal = true,
            "--strict" => args.strict = true,
            flag if flag.starts_with("--") => {
                print_usage(&program);
                return Err(anyhow!("unknown option '{flag}'"));
            }
            _ => args.inputs.push(a),
        }
    }
    Ok(Some(args))
}

/// One JSON report line for one input.
fn report(input: &str, policy: &ExtractionPolicy, reveal: bool) -> (Value, bool) {
    let show = |oid: &identity_normalizer::ObjectIdentifier| if reveal { oid.to_string() } else { oid.masked() };
    match serde_json::from_str::<Value>(input) {
        Ok(doc @ Value::Object(_)) => {
            let found = locate(policy, &doc);
            let ok = found.is_some();
            let out = json!({
                "kind": "document",
                "valid": ok,
                "field": found.as_ref().map(|l| l.field.as_str()),
                "normalized": found.as_ref().map(|l| show(&l.oid)),
            });
            (out, ok)
        }
        // JSON scalars are checked as values so `42` and `null` report as non-strings
        Ok(v) => value_report(&v, reveal, &show),
        Err(_) => value_report(&Value::String(input.to_string()), reveal, &show),
    }
}

fn value_report(v: &Value, reveal: bool, show: &dyn Fn(&identity_normalizer::ObjectIdentifier) -> String) -> (Value, bool) {
    let oid = normalize(v);
    let ok = validate(v);
    let masked = if reveal { v.as_str().map(str::to_string).unwrap_or_else(|| mask_for_logging(v)) } else { mask_for_logging(v) };
    let out = json!({
        "kind": "value",
        "valid": ok,
        "input": masked,
        "normalized": oid.as_ref().map(show),
    });
    (out, ok)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("log filter")?;
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let Some(args) = parse_args(env::args())? else { return Ok(()); };
    let mut cfg = IdentityConfig::load(args.config.as_deref())?;
    if let Some(list) = args.fields.as_deref() {
        cfg.token_fields = parse_field_list(list)?;
    }
    let reveal = args.reveal;
    info!(target: "oidctl", fields = ?cfg.token_fields.fields(), reveal, "oidctl starting");

    let inputs: Vec<String> = if args.inputs.is_empty() {
        io::stdin().lock().lines().collect::<io::Result<_>>().context("reading stdin")?
    } else {
        args.inputs
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;
    for line in inputs.iter().map(|l| l.trim_end_matches('\r')).filter(|l| !l.trim().is_empty()) {
        let (rep, ok) = report(line, &cfg.token_fields, reveal);
        if !ok { failures += 1; }
        writeln!(out, "{}", rep).context("writing report")?;
    }
    debug!(target: "oidctl", failures, "done");
    if args.strict && failures > 0 {
        return Err(anyhow!("{failures} input(s) had no usable object identifier"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";

    fn argv(list: &[&str]) -> Vec<String> {
        std::iter::once("oidctl").chain(list.iter().copied()).map(str::to_string).collect()
    }

    #[test]
    fn masking_stays_on_without_reveal_flag() {
        let args = parse_args(argv(&["--strict", A])).unwrap().unwrap();
        assert!(!args.reveal);
        assert!(args.strict);
        assert_eq!(args.inputs, vec![A.to_string()]);
        let (rep, _) = report(A, &ExtractionPolicy::default(), args.reveal);
        assert_eq!(rep["normalized"], "a1b2c3d4...7890");

        let args = parse_args(argv(&["--reveal", A])).unwrap().unwrap();
        assert!(args.reveal);
    }

    #[test]
    fn unknown_options_are_rejected() {
        let err = parse_args(argv(&["--strcit", A])).err().unwrap();
        assert!(err.to_string().contains("--strcit"));
        assert!(parse_args(argv(&["--config"])).is_err());
        assert!(parse_args(argv(&["--help"])).unwrap().is_none());
    }

    #[test]
    fn bare_value_is_masked_by_default() {
        let (rep, ok) = report(&A.to_uppercase(), &ExtractionPolicy::default(), false);
        assert!(ok);
        assert_eq!(rep["kind"], "value");
        assert_eq!(rep["normalized"], "a1b2c3d4...7890");
        assert_eq!(rep["input"], "A1B2C3D4...7890");
    }

    #[test]
    fn document_reports_field() {
        let doc = format!(r#"{{"oid":"not-a-guid","sub":"{A}"}}"#);
        let (rep, ok) = report(&doc, &ExtractionPolicy::default(), true);
        assert!(ok);
        assert_eq!(rep["field"], "sub");
        assert_eq!(rep["normalized"], A);
    }

    #[test]
    fn json_scalars_are_values() {
        let (rep, ok) = report("42", &ExtractionPolicy::default(), false);
        assert!(!ok);
        assert_eq!(rep["input"], "invalid-oid");
        assert!(rep["normalized"].is_null());
    }
}
