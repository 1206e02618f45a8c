use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "mpsi-tracker",
    version,
    about = "Suivi de prépa MPSI : planning, exercices et kholles"
)]
pub struct Cli {
    /// Fichier JSON des trois listes (planning, exercices, kholles)
    #[arg(long, default_value = "mpsi_data.json")]
    pub data_file: PathBuf,

    /// Fichier JSON des identifiants
    #[arg(long, default_value = "users.json")]
    pub users_file: PathBuf,

    /// Fichier de journal (le terminal est occupé par l'interface)
    #[arg(long, default_value = "mpsi-tracker.log")]
    pub log_file: PathBuf,
}
