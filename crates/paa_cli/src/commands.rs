use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Context;
use paa_core::{
    check_source_count, join_questions, parse_questions, ArticleExporter, ArticleResult, Credential, Error,
    GenerationRequest, Result,
};
use paa_generation::ArticleGenerator;
use paa_inference::{create_model, Config};
use paa_sources::SourceLoader;
use paa_storage::{create_store, FileExporter, FormStore, FormValues};
use paa_web::AppState;
use tracing::{debug, info};
use crate::{Cli, Commands, FormCommands, GenerateArgs, ImproveArgs};

/// Settings shared by every subcommand.
struct Session {
    config: Config,
    form: FormStore,
    api_key: Option<Credential>,
    output_dir: PathBuf,
}

impl Session {
    /// The `--api-key`/`OPENAI_API_KEY` value wins over the remembered one.
    fn credential(&self, saved: &FormValues) -> Credential {
        self.api_key.clone().unwrap_or_else(|| saved.credential.clone())
    }

    fn generator(&self) -> Result<ArticleGenerator> {
        Ok(ArticleGenerator::new(create_model(&self.config)?))
    }

    fn loader(&self) -> Result<SourceLoader> {
        SourceLoader::new(self.config.request_timeout)
    }
}

fn inference_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    if let Some(model) = &cli.model {
        config.model_name = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }
    if let Some(timeout) = &cli.timeout {
        config.request_timeout = timeout.0;
    }
    config
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = inference_config(&cli);
    debug!("Using model {} at {}", config.model_name, config.base_url);

    let session = Session {
        config,
        form: FormStore::new(create_store("file", Some(cli.state_file.as_path())).await?),
        api_key: cli.api_key.map(Credential::new).filter(|c| !c.is_empty()),
        output_dir: cli.output_dir,
    };

    match cli.command {
        Commands::Generate(args) => generate(&session, args).await,
        Commands::Improve(args) => improve(&session, args).await,
        Commands::Serve { addr } => serve(&session, addr).await,
        Commands::Form { command } => form(&session, command).await,
    }
}

/// Which timestamped copies to drop into the output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Exports {
    html: bool,
    pdf: bool,
}

async fn read_file(path: &Path) -> Result<String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text)
}

async fn read_questions(inline: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut questions = parse_questions(&inline.join("\n"));
    if let Some(path) = file {
        questions.extend(parse_questions(&read_file(path).await?));
    }
    Ok(questions)
}

/// Fills the form from the flags, keeping remembered values for anything
/// not given on the command line.
async fn merge_inputs(session: &Session, saved: &FormValues, args: &GenerateArgs) -> Result<FormValues> {
    check_source_count(args.sources.len())?;

    let mut values = saved.clone();
    if let Some(keyword) = &args.keyword {
        values.keyword = keyword.clone();
    }

    let questions = read_questions(&args.questions, args.questions_file.as_deref()).await?;
    if !questions.is_empty() {
        values.questions_text = join_questions(&questions);
    }

    if !args.sources.is_empty() {
        let mut texts = session.loader()?.load_all(&args.sources).await?.into_iter();
        values.source1 = texts.next().unwrap_or_default();
        values.source2 = texts.next().unwrap_or_default();
    }
    Ok(values)
}

async fn generate(session: &Session, args: GenerateArgs) -> Result<()> {
    let saved = session.form.load().await?;
    let values = merge_inputs(session, &saved, &args).await?;
    if !args.no_save {
        session.form.save_inputs(&values).await?;
    }

    let request = GenerationRequest {
        keyword: values.keyword.clone(),
        questions: parse_questions(&values.questions_text),
        sources: values.sources(),
        variant: args.variant,
    };

    let generator = session.generator()?;
    let article = generator.generate(&session.credential(&saved), request).await?;
    if !args.no_save {
        session.form.save_article(&article.html).await?;
    }

    let exports = Exports { html: args.export, pdf: args.export_pdf };
    emit(&article, args.output.as_deref(), &session.output_dir, exports).await
}

async fn improve(session: &Session, args: ImproveArgs) -> Result<()> {
    let saved = session.form.load().await?;
    let html = match &args.input {
        Some(path) => read_file(path).await?,
        None => session.form.load_article().await?.ok_or(Error::NothingToImprove)?,
    };
    let keyword = args.keyword.clone().unwrap_or_else(|| saved.keyword.clone());

    let generator = session.generator()?;
    generator.restore(ArticleResult::from_html(html)).await?;
    let article = generator.improve(&session.credential(&saved), &keyword).await?;
    session.form.save_article(&article.html).await?;

    let exports = Exports { html: args.export, pdf: args.export_pdf };
    emit(&article, args.output.as_deref(), &session.output_dir, exports).await
}

async fn emit(article: &ArticleResult, output: Option<&Path>, export_dir: &Path, exports: Exports) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, &article.html)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("💾 Article written to {}", path.display());
        }
        None => println!("{}", article.html),
    }

    let exporter = FileExporter::new(export_dir);
    if exports.html {
        exporter.export_html(&article.html).await?;
    }
    if exports.pdf {
        exporter.export_pdf(&article.html).await?;
    }

    info!("📊 {} words, {} min read", article.word_count, article.reading_time);
    Ok(())
}

async fn serve(session: &Session, addr: std::net::SocketAddr) -> Result<()> {
    let saved = session.form.load().await?;
    let generator = Arc::new(session.generator()?);
    if let Some(html) = session.form.load_article().await? {
        generator.restore(ArticleResult::from_html(html)).await?;
    }

    let credential = session.credential(&saved);
    let state = AppState::new(generator)
        .with_default_credential((!credential.is_empty()).then_some(credential))
        .with_exporter(Arc::new(FileExporter::new(&session.output_dir)));

    paa_web::serve(state, addr).await
}

/// Shows the tail of a key so users can tell which one is stored.
fn mask_credential(credential: &Credential) -> String {
    if credential.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = credential.expose().trim().chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

async fn form(session: &Session, command: FormCommands) -> Result<()> {
    match command {
        FormCommands::Show => {
            let values = session.form.load().await?;
            println!("credential: {}", mask_credential(&values.credential));
            println!("{}", serde_json::to_string_pretty(&values)?);
            if let Some(html) = session.form.load_article().await? {
                let article = ArticleResult::from_html(html);
                println!("last article: {} words, {} min read", article.word_count, article.reading_time);
            }
        }
        FormCommands::Set {
            keyword,
            questions_file,
            source1,
            source2,
            remember_key,
        } => {
            let mut values = session.form.load().await?;
            if let Some(keyword) = keyword {
                values.keyword = keyword;
            }
            if let Some(path) = questions_file {
                values.questions_text = join_questions(&read_questions(&[], Some(&path)).await?);
            }
            if source1.is_some() || source2.is_some() {
                let loader = session.loader()?;
                if let Some(spec) = source1 {
                    values.source1 = loader.load(&spec).await?;
                }
                if let Some(spec) = source2 {
                    values.source2 = loader.load(&spec).await?;
                }
            }
            session.form.save_inputs(&values).await?;

            if remember_key {
                let credential = session.api_key.clone().ok_or_else(|| {
                    Error::Validation("--remember-key needs --api-key or OPENAI_API_KEY".to_string())
                })?;
                session.form.save_credential(&credential).await?;
            }
            info!("✅ Form saved");
        }
        FormCommands::Clear => {
            session.form.clear().await?;
            info!("🧹 Form cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paa_storage::{FileStore, MemoryStore};
    use tempfile::tempdir;

    fn session_at(path: &Path, form: FormStore) -> Session {
        Session {
            config: Config::default(),
            form,
            api_key: None,
            output_dir: path.to_path_buf(),
        }
    }

    fn generate_args() -> GenerateArgs {
        GenerateArgs {
            keyword: None,
            questions: Vec::new(),
            questions_file: None,
            sources: Vec::new(),
            variant: Default::default(),
            output: None,
            export: false,
            export_pdf: false,
            no_save: false,
        }
    }

    #[test]
    fn test_mask_credential() {
        assert_eq!(mask_credential(&Credential::default()), "(not set)");
        assert_eq!(mask_credential(&Credential::new("short")), "****");
        assert_eq!(mask_credential(&Credential::new("sk-abcdefgh1234")), "****1234");
    }

    #[tokio::test]
    async fn test_too_many_sources_rejected() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path(), FormStore::new(Arc::new(MemoryStore::new())));

        let mut args = generate_args();
        args.sources = ["a", "b", "c"].iter().map(|s| s.parse().unwrap()).collect();
        let err = merge_inputs(&session, &FormValues::default(), &args).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("questions.txt");

        let err = read_questions(&[], Some(&missing)).await.unwrap_err();
        assert!(matches!(err, Error::External(_)));
        let message = err.user_message();
        assert!(message.starts_with(&format!("Failed to read {}: ", missing.display())));
    }

    #[tokio::test]
    async fn test_read_questions_from_flags_and_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("paa.txt");
        tokio::fs::write(&file, "- Does it hurt?\n\n• Is it safe?\n").await.unwrap();

        let inline = vec!["How much?".to_string(), "  ".to_string()];
        let questions = read_questions(&inline, Some(&file)).await.unwrap();
        assert_eq!(questions, vec!["How much?", "Does it hurt?", "Is it safe?"]);
    }

    #[tokio::test]
    async fn test_merge_keeps_saved_values() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).await.unwrap();
        let session = session_at(dir.path(), FormStore::new(Arc::new(store)));

        let saved = FormValues {
            credential: Credential::new("sk-saved"),
            keyword: "root canal cost".to_string(),
            questions_text: "How much?".to_string(),
            source1: "Clinic A".to_string(),
            source2: "Clinic B".to_string(),
        };

        let mut args = generate_args();
        args.keyword = Some("best dentists".to_string());
        args.sources = vec!["Only source".parse().unwrap()];

        let merged = merge_inputs(&session, &saved, &args).await.unwrap();
        assert_eq!(merged.keyword, "best dentists");
        assert_eq!(merged.questions_text, "How much?");
        assert_eq!(merged.sources(), vec!["Only source".to_string()]);
        assert_eq!(session.credential(&merged).expose(), "sk-saved");
    }

    #[tokio::test]
    async fn test_improve_without_saved_article() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).await.unwrap();
        let session = session_at(dir.path(), FormStore::new(Arc::new(store)));

        let args = ImproveArgs {
            keyword: None,
            input: None,
            output: None,
            export: false,
            export_pdf: false,
        };
        assert!(matches!(improve(&session, args).await, Err(Error::NothingToImprove)));
    }

    #[tokio::test]
    async fn test_emit_writes_output_and_export() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("article.html");
        let exports = dir.path().join("exports");
        let article = ArticleResult::from_html("<p>one two three</p>");

        emit(&article, Some(&output), &exports, Exports { html: true, pdf: true }).await.unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "<p>one two three</p>");
        let mut names: Vec<String> = std::fs::read_dir(&exports)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with(".html") && names[1].ends_with(".pdf"));

        let quiet = dir.path().join("quiet");
        emit(&article, Some(&output), &quiet, Exports::default()).await.unwrap();
        assert!(!quiet.exists());
    }
}
