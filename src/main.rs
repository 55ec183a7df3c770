//! CLI entry point: builds a signature source and generator settings from the
//! command line, then runs the code synthesis engine against the chosen sink

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::info;

use fnptrgen::generator::Generator;
use fnptrgen::settings::{GeneratorSettings, LoaderMode, Scope};
use fnptrgen::source::catalog::{AssemblyCatalog, DelegateSource, PInvokeSource};
use fnptrgen::source::txt::TxtListSource;
use fnptrgen::source::Source;
use fnptrgen::translate::{TranslationOptions, WordType};

/// Generates unmanaged function pointer interop scaffolding
#[derive(Debug, Parser)]
#[command(name = "fnptrgen")]
#[command(about = "Generates unmanaged function pointer fields, loader scaffolding and call wrappers")]
struct Cli {
    /// Command selecting the signature source
    #[command(subcommand)]
    command: Command,
}

/// Signature source selection
#[derive(Debug, Subcommand)]
enum Command {
    /// Generate from a flat text list of signatures, one function per line
    Txtlist {
        /// Path to the signature list file
        file: PathBuf,
        /// Generation options
        #[command(flatten)]
        generator: GeneratorArgs,
    },
    /// Generate from delegate types recorded in a metadata catalog
    Delegate {
        /// Path to the metadata catalog JSON file
        catalog: PathBuf,
        /// Full-name prefix filter; `*` selects every type
        filter: String,
        /// Generation options
        #[command(flatten)]
        generator: GeneratorArgs,
        /// Translation policy options
        #[command(flatten)]
        translation: TranslationArgs,
    },
    /// Generate from P/Invoke methods recorded in a metadata catalog
    Pinvoke {
        /// Path to the metadata catalog JSON file
        catalog: PathBuf,
        /// Full-name prefix filter; `*` selects every type
        filter: String,
        /// Generation options
        #[command(flatten)]
        generator: GeneratorArgs,
        /// Translation policy options
        #[command(flatten)]
        translation: TranslationArgs,
    },
}

/// Options shared by every generation command
#[derive(Debug, Args)]
struct GeneratorArgs {
    /// Namespace wrapping the generated class
    #[arg(long)]
    namespace: String,
    /// Name of the generated class
    #[arg(long)]
    class: String,
    /// Default calling convention tag applied when a signature has none
    #[arg(long)]
    callconv: Option<String>,
    /// Spaces per indent level; 0 uses a single tab
    #[arg(long, default_value_t = 0)]
    indentation: u8,
    /// Member scope of the generated class
    #[arg(long, value_enum, default_value = "static")]
    scope: ScopeArg,
    /// Loader emission mode
    #[arg(long, value_enum, default_value = "function")]
    loader: LoaderArg,
    /// Emit aggressive inlining hints before wrapper methods
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    inline: bool,
    /// Output file; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Translation policy options for the catalog-backed commands
#[derive(Debug, Args)]
struct TranslationArgs {
    /// Preferred spelling for pointer-sized integer types
    #[arg(long, value_enum, default_value = "intptr")]
    word_type: WordArg,
    /// Keep in/ref/out modifiers instead of erasing them to raw pointers
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    preserve_byrefs: bool,
    /// Keep framework primitive type names instead of native-style spellings
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    preserve_types: bool,
}

/// CLI spelling of [`Scope`]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    /// Class, fields and methods are all static
    Static,
    /// Instance members qualified by `this`
    Instance,
}

/// CLI spelling of [`LoaderMode`]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LoaderArg {
    /// No loader block
    None,
    /// Public `Init` method
    Function,
    /// Constructor / type initializer
    Constructor,
}

/// CLI spelling of [`WordType`]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WordArg {
    /// Framework `IntPtr`/`UIntPtr` spellings
    Intptr,
    /// Native-int aliases `nint`/`nuint`
    Nint,
}

impl GeneratorArgs {
    /// Builds generator settings from the parsed arguments
    fn settings(&self) -> GeneratorSettings {
        let mut settings = GeneratorSettings::new(&self.namespace, &self.class);
        settings.scope = match self.scope {
            ScopeArg::Static => Scope::Static,
            ScopeArg::Instance => Scope::Instance,
        };
        settings.loader = match self.loader {
            LoaderArg::None => LoaderMode::None,
            LoaderArg::Function => LoaderMode::Function,
            LoaderArg::Constructor => LoaderMode::Constructor,
        };
        settings.aggressive_inline = self.inline;
        settings.calling_convention = self.callconv.clone();
        settings.indentation = self.indentation;
        settings
    }
}

impl TranslationArgs {
    /// Builds the translation policy from the parsed arguments
    fn options(&self) -> TranslationOptions {
        TranslationOptions {
            preferred_word: match self.word_type {
                WordArg::Intptr => WordType::IntPtr,
                WordArg::Nint => WordType::Nint,
            },
            preserve_by_ref: self.preserve_byrefs,
            preserve_type_names: self.preserve_types,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Txtlist { file, generator } => {
            let reader = BufReader::new(
                File::open(&file).with_context(|| format!("opening {}", file.display()))?,
            );
            generate(TxtListSource::new(reader), &generator)
        }
        Command::Delegate {
            catalog,
            filter,
            generator,
            translation,
        } => {
            let catalog = load_catalog(&catalog)?;
            generate(
                DelegateSource::new(catalog, &filter, translation.options()),
                &generator,
            )
        }
        Command::Pinvoke {
            catalog,
            filter,
            generator,
            translation,
        } => {
            let catalog = load_catalog(&catalog)?;
            generate(
                PInvokeSource::new(catalog, &filter, translation.options()),
                &generator,
            )
        }
    }
}

/// Reads and decodes a metadata catalog from disk
fn load_catalog(path: &Path) -> Result<AssemblyCatalog> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let catalog = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(catalog)
}

/// Runs the generator against the chosen sink, flushing on completion
fn generate<S: Source>(source: S, args: &GeneratorArgs) -> Result<()> {
    let mut settings = args.settings();
    // a configuration error must not truncate an existing output file
    settings.validate().context("invalid generator settings")?;

    match &args.out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut generator = Generator::new(source, BufWriter::new(file), settings)?;
            generator.process()?;
            generator.into_output().flush()?;
            info!("artifact written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut generator = Generator::new(source, stdout.lock(), settings)?;
            generator.process()?;
            generator.into_output().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use fnptrgen::source::VecSource;

    use crate::{GeneratorArgs, LoaderArg, ScopeArg};

    #[test]
    /// A configuration error must not truncate a pre-existing output file
    fn invalid_settings_keep_existing_output() {
        // a previously generated artifact sits at the output path
        let path = std::env::temp_dir().join(format!("fnptrgen-keep-{}.cs", std::process::id()));
        fs::write(&path, "previous artifact").unwrap();

        // the class name is blank, so validation fails before the sink is opened
        let args = GeneratorArgs {
            namespace: String::from("Native"),
            class: String::new(),
            callconv: None,
            indentation: 0,
            scope: ScopeArg::Static,
            loader: LoaderArg::Function,
            inline: true,
            out: Some(path.clone()),
        };
        assert!(crate::generate(VecSource::default(), &args).is_err());

        // the earlier artifact survives intact
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous artifact");
        fs::remove_file(&path).unwrap();
    }
}
