//! Integration tests for the relocate-chart binary

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde_yaml::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tar::{Archive, Builder, Header};
use tempfile::TempDir;

const CHART_YAML: &str = "apiVersion: v2\nname: mychart\nversion: 1.0.0\n";
const DEPLOY_YAML: &str = "apiVersion: apps/v1\nkind: Deployment\n";

/// Helper to run relocate-chart
fn relocate_chart(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_relocate-chart"))
        .args(args)
        .output()
        .expect("Failed to execute relocate-chart")
}

fn write_chart(dir: &Path, values: &str) -> PathBuf {
    let path = dir.join("mychart-1.0.0.tgz");
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    for (name, content) in [
        ("mychart/Chart.yaml", CHART_YAML),
        ("mychart/values.yaml", values),
        ("mychart/templates/deploy.yaml", DEPLOY_YAML),
    ] {
        let mut header = Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1_600_000_000);
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }

    let bytes = builder.into_inner().unwrap().finish().unwrap();
    std::fs::write(&path, bytes).unwrap();
    path
}

fn read_chart(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = Archive::new(GzDecoder::new(file));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (entry.path().unwrap().to_string_lossy().to_string(), content)
        })
        .collect()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

mod relocate_command {
    use super::*;

    #[test]
    fn test_relocates_chart() {
        let temp = TempDir::new().unwrap();
        let chart = write_chart(
            temp.path(),
            "replicaCount: 1\nimage:\n  repository: old/repo\n",
        );

        let output = relocate_chart(&[
            arg(&chart),
            "--registry",
            "new.registry.local",
            "--namespace",
            "new-ns",
        ]);

        assert!(output.status.success(), "Expected success: {:?}", output);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Rewrote"));
        assert!(stdout.contains("new.registry.local/new-ns/"));

        let relocated = temp.path().join("mychart-1.0.0.tgz.tgz");
        let entries = read_chart(&relocated);
        let paths: Vec<_> = entries.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            [
                "mychart/Chart.yaml",
                "mychart/values.yaml",
                "mychart/templates/deploy.yaml"
            ]
        );
        assert_eq!(entries[0].1, CHART_YAML.as_bytes());
        assert_eq!(entries[2].1, DEPLOY_YAML.as_bytes());

        let values: Value = serde_yaml::from_slice(&entries[1].1).unwrap();
        assert_eq!(values["global"]["imageRegistry"], "new.registry.local");
        assert_eq!(values["global"]["imageNamespace"], "new-ns");
        assert_eq!(values["image"]["repository"], "old/repo");
    }

    #[test]
    fn test_short_flags_and_output() {
        let temp = TempDir::new().unwrap();
        let chart = write_chart(temp.path(), "global:\n  imagePullSecrets: []\n");
        let dest = temp.path().join("relocated.tgz");

        let output = relocate_chart(&[
            arg(&chart),
            "-r",
            "new.registry.local",
            "-n",
            "new-ns",
            "-o",
            arg(&dest),
        ]);

        assert!(output.status.success());
        let entries = read_chart(&dest);
        let values: Value = serde_yaml::from_slice(&entries[1].1).unwrap();
        let global = values["global"].as_mapping().unwrap();
        assert_eq!(global.len(), 3);
        assert_eq!(values["global"]["imagePullSecrets"], Value::Sequence(vec![]));
    }

    #[test]
    fn test_json_output() {
        let temp = TempDir::new().unwrap();
        let chart = write_chart(temp.path(), "replicaCount: 1\n");

        let output = relocate_chart(&[arg(&chart), "-r", "r.local", "-n", "ns", "--json"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value =
            serde_json::from_str(&stdout).expect("Output should be valid JSON");

        assert_eq!(json["entries"], 3);
        assert_eq!(json["imagePrefix"], "r.local/ns/");
        assert_eq!(json["rewritten"]["path"], "mychart/values.yaml");
        assert_eq!(json["relocation"]["registry"], "r.local");
    }

    #[test]
    fn test_refuses_existing_output() {
        let temp = TempDir::new().unwrap();
        let chart = write_chart(temp.path(), "replicaCount: 1\n");
        let dest = temp.path().join("mychart-1.0.0.tgz.tgz");
        std::fs::write(&dest, b"keep me").unwrap();

        let output = relocate_chart(&[arg(&chart), "-r", "r.local"]);
        assert_eq!(output.status.code(), Some(2));
        assert_eq!(std::fs::read(&dest).unwrap(), b"keep me");

        let output = relocate_chart(&[arg(&chart), "-r", "r.local", "--force"]);
        assert!(output.status.success());
        assert_eq!(read_chart(&dest).len(), 3);
    }

    #[test]
    fn test_refuses_output_equal_to_input() {
        let temp = TempDir::new().unwrap();
        let chart = write_chart(temp.path(), "replicaCount: 1\n");

        let output = relocate_chart(&[arg(&chart), "-o", arg(&chart), "--force"]);

        assert_eq!(output.status.code(), Some(2));
        assert!(!read_chart(&chart).is_empty());
    }

    #[test]
    fn test_directory_is_rejected() {
        let temp = TempDir::new().unwrap();

        let output = relocate_chart(&[arg(temp.path()), "-r", "r.local"]);

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("directory"));
    }

    #[test]
    fn test_missing_chart_is_rejected() {
        let temp = TempDir::new().unwrap();
        let output = relocate_chart(&[arg(&temp.path().join("missing.tgz"))]);
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_invalid_global_leaves_no_output() {
        let temp = TempDir::new().unwrap();
        let chart = write_chart(temp.path(), "global: docker.io\n");

        let output = relocate_chart(&[arg(&chart), "-r", "r.local"]);

        assert_eq!(output.status.code(), Some(4));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("global"));
        assert!(!temp.path().join("mychart-1.0.0.tgz.tgz").exists());
    }

    #[test]
    fn test_not_a_tarball() {
        let temp = TempDir::new().unwrap();
        let chart = temp.path().join("chart.tgz");
        std::fs::write(&chart, b"plain text").unwrap();

        let output = relocate_chart(&[arg(&chart)]);

        assert_eq!(output.status.code(), Some(4));
        assert!(!temp.path().join("chart.tgz.tgz").exists());
    }

    #[test]
    fn test_missing_chart_argument_is_usage_error() {
        let output = relocate_chart(&[]);
        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_compression_out_of_range() {
        let temp = TempDir::new().unwrap();
        let chart = write_chart(temp.path(), "replicaCount: 1\n");

        let output = relocate_chart(&[arg(&chart), "--compression", "12"]);
        assert_eq!(output.status.code(), Some(64));
    }
}
