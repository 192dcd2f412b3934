use crate::domain::contact::ContactDraft;
use crate::utils::error::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct SubmitArgs {
    /// Read the contact from a JSON file; flags below override its fields
    #[arg(long)]
    pub from_json: Option<PathBuf>,

    #[arg(long)]
    pub rut: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub telefono: Option<String>,

    #[arg(long)]
    pub calle: Option<String>,

    #[arg(long)]
    pub numero: Option<String>,

    #[arg(long)]
    pub comuna: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub postal: Option<String>,

    #[arg(long)]
    pub complemento: Option<String>,

    /// Validate and print the summary without posting
    #[arg(long)]
    pub dry_run: bool,
}

impl SubmitArgs {
    pub fn to_draft(&self) -> Result<ContactDraft> {
        let mut draft = match &self.from_json {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                serde_json::from_str(&content)?
            }
            None => ContactDraft::default(),
        };

        let overrides = [
            (&self.rut, &mut draft.rut),
            (&self.email, &mut draft.email),
            (&self.telefono, &mut draft.telefono),
            (&self.calle, &mut draft.direccion.calle),
            (&self.numero, &mut draft.direccion.numero),
            (&self.comuna, &mut draft.direccion.comuna),
            (&self.region, &mut draft.direccion.region),
            (&self.postal, &mut draft.direccion.postal),
            (&self.complemento, &mut draft.direccion.complemento),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }

        Ok(draft)
    }
}
