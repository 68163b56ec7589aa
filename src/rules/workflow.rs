//! Path-scoped rules
//!
//! Files whose category alone warrants a reminder, whatever they contain.

use crate::rules::Rule;

/// Rules evaluated against the file path only
pub const WORKFLOW_RULES: &[Rule] = &[Rule::path(
    "github-actions-workflow",
    is_github_workflow,
    r#"⚠️ Security Warning: You are editing a GitHub Actions workflow file. Be aware of these security risks:

1. **Command Injection**: Never use untrusted input (issue titles, PR descriptions, commit messages, branch names) directly in `run:` commands without proper escaping
2. **Use environment variables**: Instead of ${{ github.event.issue.title }}, pass the value through `env:` and quote it

Unsafe:
run: echo "${{ github.event.issue.title }}"

Safe:
env:
  TITLE: ${{ github.event.issue.title }}
run: echo "$TITLE"

Risky inputs include:
- github.event.issue.title / body
- github.event.pull_request.title / body
- github.event.comment.body
- github.event.review.body
- github.event.commits.*.message / author.email / author.name
- github.event.head_commit.message / author.email / author.name
- github.head_ref"#,
)];

/// True for YAML files under `.github/workflows/`
pub fn is_github_workflow(path: &str) -> bool {
    path.contains(".github/workflows/") && (path.ends_with(".yml") || path.ends_with(".yaml"))
}
