use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let path_arg = |arg: clap::Arg| arg.value_parser(clap::value_parser!(std::path::PathBuf));

    let mut cmd = clap::Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Folio Contributors")
        .about("Export Instapaper articles to PDF with highlight notes")
        .arg(path_arg(clap::arg!(-c --config <FILE> "Config file")))
        .arg(clap::arg!(--api_key <KEY> "Instapaper OAuth consumer key"))
        .arg(clap::arg!(--api_secret <SECRET> "Instapaper OAuth consumer secret"))
        .arg(clap::arg!(--login <LOGIN> "Instapaper account login"))
        .arg(clap::arg!(--password <PASSWORD> "Instapaper account password"))
        .arg(clap::arg!(-f --folder <NAME> "Folder to export from"))
        .arg(clap::arg!(-l --limit <NUM> "Maximum number of bookmarks to export"))
        .arg(path_arg(clap::arg!(--pdf_root <DIR> "Root directory for PDFs")))
        .arg(path_arg(clap::arg!(--notes_root <DIR> "Directory for highlight notes")))
        .arg(clap::arg!(--renderer <PROGRAM> "HTML-to-PDF renderer executable"))
        .arg(path_arg(clap::arg!(--staging_dir <DIR> "Directory for staged HTML files")))
        .arg(clap::arg!(--archive "Archive each bookmark once its PDF has rendered"))
        .arg(clap::arg!(--no_archive "Leave bookmarks in their folder, even if the config file says to archive"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds"))
        .arg(clap::arg!(--api_url <URL> "Instapaper API host"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Print a shell completion script and exit")
                .value_name("SHELL")
                .value_parser(["bash", "elvish", "fish", "powershell", "zsh"]),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "folio", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "folio", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
