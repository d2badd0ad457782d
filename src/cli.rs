use std::future::Future;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ClassifierConfig, APP_NAME};
use crate::localization::{message_for, text, MessageKey};
use crate::models::enums::Locale;
use crate::pipeline::classification::{CancelSignal, ClassificationResult};
use crate::pipeline::processor::{SubmitError, WasteClassifier};

/// Exit code when the image is refused before classification.
pub const EXIT_REJECTED: i32 = 2;
/// Exit code when the model call or its reply fails.
pub const EXIT_FAILED: i32 = 1;

#[derive(Debug, Parser)]
#[command(name = "ecosort", version, about = "Classify a photo of a waste item by disposal category")]
pub struct Cli {
    /// Photo to classify (JPEG, PNG, GIF or WebP, at most 5 MB)
    pub image: PathBuf,

    /// Display language for the explanation and messages
    #[arg(long, default_value = "en")]
    pub lang: Locale,

    /// Media type of the image; guessed from the extension when omitted
    #[arg(long)]
    pub mime: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run one classification and return the process exit code.
pub async fn execute(cli: Cli) -> i32 {
    let config = ClassifierConfig::from_env();
    let classifier = match WasteClassifier::from_config(&config) {
        Ok(classifier) => classifier,
        Err(e) => {
            let err = SubmitError::from(e);
            report_failure(&err, cli.lang);
            return exit_code(&err);
        }
    };

    let cancel = CancelSignal::new();
    eprintln!("{}", text(MessageKey::Analyzing, cli.lang));

    let submission =
        classifier.submit_file_with_cancel(&cli.image, cli.mime.as_deref(), &cancel);
    let outcome = cancel_on_interrupt(submission, tokio::signal::ctrl_c(), &cancel).await;

    match outcome {
        Ok(result) => {
            if cli.json {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize result");
                        return EXIT_FAILED;
                    }
                }
            } else {
                println!("{}", render_result(&result, cli.lang));
            }
            0
        }
        Err(err) => {
            report_failure(&err, cli.lang);
            exit_code(&err)
        }
    }
}

/// Drive `submission` to completion, cancelling it once `interrupt`
/// delivers. A failed signal listener leaves the submission running.
async fn cancel_on_interrupt<T>(
    submission: impl Future<Output = T>,
    interrupt: impl Future<Output = std::io::Result<()>>,
    cancel: &CancelSignal,
) -> T {
    tokio::pin!(submission);
    tokio::select! {
        outcome = &mut submission => outcome,
        signal = interrupt => {
            match signal {
                Ok(()) => {
                    tracing::info!("Interrupted, cancelling classification");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "Ctrl-C listener unavailable"),
            }
            submission.await
        }
    }
}

fn report_failure(err: &SubmitError, lang: Locale) {
    tracing::debug!(code = err.code(), error = %err, "Submission failed");
    eprintln!("{APP_NAME}: {} [{}]", message_for(err, lang), err.code());
}

pub fn exit_code(err: &SubmitError) -> i32 {
    match err {
        SubmitError::Rejected(_) => EXIT_REJECTED,
        SubmitError::Classification(_) => EXIT_FAILED,
    }
}

/// Human-readable result card.
pub fn render_result(result: &ClassificationResult, lang: Locale) -> String {
    let disposal_type = result.disposal_type();
    format!(
        "{} {} ({:.0}%)\n{}\n{}",
        disposal_type.icon(),
        disposal_type,
        result.confidence() * 100.0,
        result.item_name(),
        result.explanation(lang),
    )
}
