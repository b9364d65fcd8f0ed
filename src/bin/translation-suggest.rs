use clap::{Arg, Command};
use translation_suggest::{
    create_provider, MockMode, MockTranslationEngine, OpenAiTranslate, PreserveMode,
    SuggestionProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("translation-suggest")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translation suggestion CLI")
        .arg(
            Arg::new("text")
                .help("Source text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target")
                .help("Target language code (e.g., fr, es, de)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code (default: detect automatically)"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .short('p')
                .help("Suggestion provider to use (google or openai)")
                .default_value("google"),
        )
        .arg(
            Arg::new("no-preserve")
                .long("no-preserve")
                .help("Do not preserve :name style placeholders")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("detect")
                .long("detect")
                .short('d')
                .help("Detect the source language instead of translating (openai only)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use a mock engine instead of a real service")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches.get_one::<String>("text").unwrap();
    let target = matches.get_one::<String>("target").unwrap();
    let source = matches.get_one::<String>("source");
    let provider_name = matches.get_one::<String>("provider").unwrap();
    let no_preserve = matches.get_flag("no-preserve");
    let detect = matches.get_flag("detect");
    let use_mock = matches.get_flag("mock");

    if detect {
        if provider_name != "openai" {
            eprintln!("Language detection is only supported by the openai provider");
            return Err("unsupported provider for --detect".into());
        }

        let mut provider = OpenAiTranslate::from_env()?.with_target(Some(target.as_str()));
        match provider.detect(text).await? {
            Some(code) => println!("{}", code),
            None => println!("no detected language"),
        }
        return Ok(());
    }

    let mut provider: Box<dyn SuggestionProvider> = if use_mock {
        Box::new(translation_suggest::GoogleTranslate::with_engine(
            std::sync::Arc::new(MockTranslationEngine::new(MockMode::Suffix)),
        ))
    } else {
        create_provider(provider_name)?
    };

    provider.set_source(source.map(|s| s.as_str()));
    provider.set_target(Some(target.as_str()));
    if no_preserve {
        provider.preserve_parameters(PreserveMode::Disabled);
    }

    let suggestion = provider.translate(Some(text)).await?;
    println!("{}", suggestion);

    Ok(())
}
