//! Code and command injection rules
//!
//! Content patterns for dynamic evaluation, shell execution and unsafe
//! deserialization sinks across JavaScript and Python.

use crate::rules::Rule;

pub const INJECTION_RULES: &[Rule] = &[
    Rule::substrings(
        "child-process-exec",
        &["child_process.exec", "exec(", "execSync("],
        r#"⚠️ Security Warning: Using child_process.exec() can lead to command injection vulnerabilities.

exec() runs its argument through a shell, so any user-controlled piece of the string can inject extra commands.

Instead of:
  exec(`git log ${branch}`)

Use execFile() or spawn() with an argument array, which never invokes a shell:
  execFile('git', ['log', branch])

Only use exec() when you genuinely need shell features and every input is trusted."#,
    ),
    Rule::substrings(
        "new-function-injection",
        &["new Function"],
        "⚠️ Security Warning: Using new Function() with dynamic strings can lead to code injection vulnerabilities. \
Consider alternatives that don't evaluate arbitrary code, such as a lookup table of functions or JSON.parse() for data.",
    ),
    Rule::substrings(
        "eval-injection",
        &["eval("],
        "⚠️ Security Warning: eval() executes arbitrary code and is a major security risk. \
Consider using JSON.parse() for data parsing, ast.literal_eval() in Python, or an explicit dispatch table \
instead of evaluating strings as code. Only use eval() if you truly need to evaluate arbitrary code.",
    ),
    Rule::substrings(
        "pickle-deserialization",
        &["pickle"],
        "⚠️ Security Warning: Using pickle with untrusted content can lead to arbitrary code execution, \
because unpickling can construct any object and call any function. Use JSON or another data-only format \
for anything that crosses a trust boundary, and only unpickle data you produced yourself.",
    ),
    Rule::substrings(
        "os-system-injection",
        &["os.system", "from os import system"],
        r#"⚠️ Security Warning: os.system() passes its argument to a shell and should only be used with static strings.

Instead of:
  os.system(f"convert {filename} out.png")

Use subprocess with an argument list:
  subprocess.run(["convert", filename, "out.png"], check=True)"#,
    ),
    Rule::substrings(
        "subprocess-shell-true",
        &["shell=True"],
        r#"⚠️ Security Warning: subprocess with shell=True runs the command through a shell, so interpolated values can inject commands.

Instead of:
  subprocess.run(f"tar -xf {archive}", shell=True)

Pass an argument list and leave shell at its default:
  subprocess.run(["tar", "-xf", archive], check=True)"#,
    ),
    Rule::substrings(
        "yaml-unsafe-load",
        &["yaml.load(", "yaml.unsafe_load("],
        r#"⚠️ Security Warning: yaml.load() without a safe loader can instantiate arbitrary Python objects from the document.

Instead of:
  config = yaml.load(stream)

Use the safe loader:
  config = yaml.safe_load(stream)"#,
    ),
];
