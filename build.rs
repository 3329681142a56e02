use std::process::Command;

const CSS_INPUT: &str = "static/css/input.css";
const CSS_OUTPUT: &str = "static/css/dist/output.css";

fn main() {
    println!("cargo:rerun-if-changed={CSS_INPUT}");
    println!("cargo:rerun-if-changed=templates/");
    println!("cargo:rerun-if-env-changed=CONSOLE_SKIP_CSS");

    // Offline and CI builds can ship a prebuilt stylesheet.
    if std::env::var_os("CONSOLE_SKIP_CSS").is_some() {
        return;
    }

    let status = Command::new("npx")
        .args(["@tailwindcss/cli", "-i", CSS_INPUT, "-o", CSS_OUTPUT, "--minify"])
        .status();

    match status {
        Ok(s) if s.success() => {}
        Ok(s) => println!("cargo:warning=stylesheet build exited with: {s}"),
        Err(e) => println!("cargo:warning=could not run the Tailwind CLI ({e}); pages will be unstyled"),
    }
}
