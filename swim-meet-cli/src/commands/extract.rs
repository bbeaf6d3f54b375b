use clap::Args;
use std::path::{Path, PathBuf};
use swim_meet_core::extract::mime_for_extension;
use swim_meet_core::{
    load_pdf_file, ExtractionClient, GeminiModel, MeetSession, PageImage, PdfFetcher,
};
use tracing::info;

use super::runtime;
use crate::config::Config;
use crate::workspace::{save_session, DEFAULT_MEET_FILE};

#[derive(Args)]
pub struct ExtractCommand {
    /// Announcement PDF or page images, in page order
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Download the announcement PDF from this URL
    #[arg(long, conflicts_with = "files")]
    pub url: Option<String>,

    /// Model to use (flash, pro); defaults to the configured model
    #[arg(long, short)]
    pub model: Option<GeminiModel>,

    /// Working meet file to write
    #[arg(long, short, default_value = DEFAULT_MEET_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing meet file
    #[arg(long)]
    pub force: bool,
}

impl ExtractCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        if self.files.is_empty() && self.url.is_none() {
            return Err("Provide announcement files or --url".into());
        }
        if self.output.exists() && !self.force {
            return Err(format!(
                "'{}' already exists. Use --force to overwrite it.",
                self.output.display()
            )
            .into());
        }

        let api_key = config
            .settings
            .gemini_api_key
            .clone()
            .ok_or("Gemini API key is not configured. Run 'meet config set gemini_api_key <KEY>'.")?;
        let model = self.model.unwrap_or(config.settings.gemini_model);

        let rt = runtime()?;
        let session = rt.block_on(self.extract(config, &api_key, model))?;
        save_session(&self.output, &session)?;

        if let Some(meet_info) = session.meet_info() {
            print!("{}", meet_info);
            println!();
        }
        println!(
            "Extracted {} event(s) to {}",
            session.events().len(),
            self.output.display()
        );
        Ok(())
    }

    async fn extract(
        &self,
        config: &Config,
        api_key: &str,
        model: GeminiModel,
    ) -> Result<MeetSession, Box<dyn std::error::Error>> {
        let pages = match &self.url {
            Some(url) => {
                let document = PdfFetcher::new()
                    .fetch_pdf(url, &config.settings.proxy)
                    .await?;
                info!(document = %document, "downloaded announcement");
                vec![PageImage::pdf(document.bytes)]
            }
            None => self
                .files
                .iter()
                .map(|path| load_page(path))
                .collect::<Result<Vec<_>, _>>()?,
        };

        println!("Extracting {} page file(s) with {}...", pages.len(), model);
        let data = ExtractionClient::new(api_key).extract(&pages, model).await?;
        Ok(MeetSession::from_extraction(data))
    }
}

/// Reads one announcement file as a page for the extraction request.
fn load_page(path: &Path) -> Result<PageImage, Box<dyn std::error::Error>> {
    let mime = mime_for_extension(path).ok_or_else(|| {
        format!(
            "Unsupported file type: {} (expected pdf, jpg, png, webp or heic)",
            path.display()
        )
    })?;

    if mime == "application/pdf" {
        let document = load_pdf_file(path)?;
        return Ok(PageImage::pdf(document.bytes));
    }

    let bytes =
        std::fs::read(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    Ok(PageImage::new(mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Parser, Subcommand};
    use tempfile::tempdir;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Extract(ExtractCommand),
    }

    fn parse(args: &[&str]) -> Result<ExtractCommand, clap::Error> {
        let mut argv = vec!["meet", "extract"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).map(|cli| match cli.command {
            TestCommands::Extract(cmd) => cmd,
        })
    }

    #[test]
    fn test_parse_files_and_model() {
        let cmd = parse(&["page1.png", "page2.png", "--model", "pro", "-o", "out.json"]).unwrap();
        assert_eq!(cmd.files.len(), 2);
        assert_eq!(cmd.model, Some(GeminiModel::Pro));
        assert_eq!(cmd.output, PathBuf::from("out.json"));
        assert!(!cmd.force);
    }

    #[test]
    fn test_parse_url_conflicts_with_files() {
        assert!(parse(&["meet.pdf", "--url", "https://club.org/meet.pdf"]).is_err());
        let cmd = parse(&["--url", "https://club.org/meet.pdf"]).unwrap();
        assert_eq!(cmd.output, PathBuf::from("meet.json"));
    }

    #[test]
    fn test_parse_rejects_unknown_model() {
        assert!(parse(&["a.pdf", "--model", "ultra"]).is_err());
    }

    #[test]
    fn test_load_page_by_extension() {
        let temp_dir = tempdir().unwrap();
        let image = temp_dir.path().join("page.PNG");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
        let page = load_page(&image).unwrap();
        assert_eq!(page.mime_type, "image/png");
        assert_eq!(page.bytes.len(), 4);

        let pdf = temp_dir.path().join("meet.pdf");
        std::fs::write(&pdf, b"%PDF-1.7 body").unwrap();
        assert_eq!(load_page(&pdf).unwrap().mime_type, "application/pdf");

        let fake_pdf = temp_dir.path().join("fake.pdf");
        std::fs::write(&fake_pdf, b"hello").unwrap();
        assert!(load_page(&fake_pdf).is_err());

        let text = temp_dir.path().join("notes.txt");
        std::fs::write(&text, b"hello").unwrap();
        assert!(load_page(&text).is_err());
    }
}
