use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

/// A fresh `git init`-ed directory with its own manifest location
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let status = std::process::Command::new("git")
            .arg("init")
            .arg("--quiet")
            .current_dir(dir.path())
            .status()
            .expect("Failed to run git init");
        assert!(status.success());
        Workspace { dir }
    }

    fn partner(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("partner").expect("binary should build");
        cmd.current_dir(self.dir.path())
            .env("PARTNER_MANIFEST", self.dir.child("manifest.json").path())
            .env("NO_COLOR", "1")
            .env_remove("PARTNER_LOG")
            .args(args);
        cmd
    }

    fn add(&self, id: &str, name: &str, email: &str) {
        self.partner(&["manifest", "add", "--id", id, "--name", name, "--email", email])
            .assert()
            .success();
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.partner(args).assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("stdout should be utf-8")
    }

    fn commit_template_setting(&self) -> Option<String> {
        let output = std::process::Command::new("git")
            .args(["config", "--get", "commit.template"])
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run git config");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[test]
fn manifest_add_list_remove() {
    let ws = Workspace::new();
    ws.add("brett", "Brett Buddin", "brett@buddin.org");

    assert_eq!(
        ws.stdout(&["manifest", "list"]),
        "ID     NAME          EMAIL             TYPE\nbrett  Brett Buddin  brett@buddin.org  manual\n"
    );

    ws.partner(&["manifest", "rm", "brett"]).assert().success();
    assert_eq!(ws.stdout(&["manifest", "ls"]), "");
}

#[test]
fn activation_workflow() {
    let ws = Workspace::new();
    let template = ws.dir.child(".git/gitmessage.txt");
    ws.add("brett", "Brett Buddin", "brett@buddin.org");
    ws.add("persona", "Person A", "a@buddin.org");

    ws.partner(&["set", "brett"]).assert().success();
    template.assert(
        "\n\n# Managed by partner\n#\n# partner-id: brett\nCo-Authored-By: \"Brett Buddin\" <brett@buddin.org>\n",
    );
    let setting = ws.commit_template_setting().expect("commit.template should be set");
    assert!(setting.ends_with("gitmessage.txt"));

    ws.partner(&["activate", "persona"]).assert().success();
    assert_eq!(
        ws.stdout(&["status"]),
        "ID       NAME          EMAIL             TYPE\n\
         brett    Brett Buddin  brett@buddin.org  manual\n\
         persona  Person A      a@buddin.org      manual\n"
    );
    template.assert(predicate::str::contains(
        "# partner-id: brett\nCo-Authored-By: \"Brett Buddin\" <brett@buddin.org>\n\
         # partner-id: persona\nCo-Authored-By: \"Person A\" <a@buddin.org>\n",
    ));

    ws.partner(&["clear"]).assert().success();
    assert_eq!(ws.stdout(&["status"]), "");
    template.assert(predicate::path::missing());
    assert_eq!(ws.commit_template_setting(), None);
}

#[test]
fn activating_unknown_coauthor_fails_without_writing() {
    let ws = Workspace::new();
    ws.add("brett", "Brett Buddin", "brett@buddin.org");

    ws.partner(&["set", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown coauthor \"ghost\""));
    ws.dir
        .child(".git/gitmessage.txt")
        .assert(predicate::path::missing());
    assert_eq!(ws.commit_template_setting(), None);
}

#[test]
fn clear_without_template_succeeds() {
    let ws = Workspace::new();
    ws.partner(&["clear"]).assert().success();
    ws.partner(&["clear"]).assert().success();
}

#[test]
fn duplicate_add_fails() {
    let ws = Workspace::new();
    ws.add("brett", "Brett Buddin", "brett@buddin.org");
    ws.partner(&["manifest", "add", "--id", "BRETT", "--name", "B", "--email", "b@buddin.org"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn missing_arguments_are_usage_errors() {
    let ws = Workspace::new();
    ws.partner(&["set"]).assert().code(2);
    ws.partner(&["manifest", "remove"]).assert().code(2);
    ws.partner(&["manifest", "add", "--id", "brett"]).assert().code(2);
}

#[test]
fn status_without_manifest_is_empty() {
    let ws = Workspace::new();
    ws.partner(&["status"]).assert().success().stdout("");
}
