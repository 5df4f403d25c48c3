use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

use strum::IntoEnumIterator;

use crate::{
    client::ImageGenerator,
    config::{GeneratorConfig, DEFAULT_DOWNLOAD_FOLDER},
    error::Result,
    models::{GenerationOptions, ImageQuality, ImageSize, ImageStyle},
};

pub const EXIT_KEYWORDS: [&str; 3] = ["quit", "exit", "q"];

const RULE_WIDTH: usize = 60;

pub fn is_exit_keyword(input: &str) -> bool {
    EXIT_KEYWORDS.contains(&input.to_lowercase().as_str())
}

/// Writes `question` and reads one trimmed line. `None` means end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn choices<T: IntoEnumIterator + Display>() -> String {
    T::iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// Asks for the API key and download folder. `Ok(None)` when no key was given.
pub fn setup<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<GeneratorConfig>> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(output, "{rule}")?;
    writeln!(output, "  IMAGE GENERATOR")?;
    writeln!(output, "{rule}")?;

    let api_key = ask(input, output, "\n🔑 Enter your API key: ")?.unwrap_or_default();
    if api_key.is_empty() {
        writeln!(output, "❌ API key is required!")?;
        return Ok(None);
    }

    let folder = ask(
        input,
        output,
        &format!("📁 Enter download folder name (default: '{DEFAULT_DOWNLOAD_FOLDER}'): "),
    )?
    .filter(|folder| !folder.is_empty())
    .unwrap_or_else(|| DEFAULT_DOWNLOAD_FOLDER.to_string());

    Ok(Some(GeneratorConfig::new(api_key).with_download_folder(folder)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingPrompt,
    Exiting,
}

/// The interactive prompt loop and its running success count.
pub struct Session<R, W> {
    generator: ImageGenerator,
    input: R,
    output: W,
    image_count: usize,
    state: LoopState,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(generator: ImageGenerator, input: R, output: W) -> Self {
        Self {
            generator,
            input,
            output,
            image_count: 0,
            state: LoopState::AwaitingPrompt,
        }
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until an exit keyword or end of input and returns the number of
    /// images saved.
    pub async fn run(&mut self) -> Result<usize> {
        self.print_intro()?;

        while self.state == LoopState::AwaitingPrompt {
            self.step().await?;
        }

        writeln!(
            self.output,
            "\n✓ Generated {} images. Goodbye!",
            self.image_count
        )?;
        Ok(self.image_count)
    }

    fn print_intro(&mut self) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let config = self.generator.config();
        let (size, quality, style) = (
            config.default_size,
            config.default_quality,
            config.default_style,
        );

        writeln!(self.output, "\n{rule}")?;
        writeln!(
            self.output,
            "Ready to generate images! Type 'quit' or 'exit' to stop."
        )?;
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "\n⚙️  Options (press Enter to use defaults):")?;
        writeln!(self.output, "  - Size: {size} (one of: {})", choices::<ImageSize>())?;
        writeln!(
            self.output,
            "  - Quality: {quality} (one of: {})",
            choices::<ImageQuality>()
        )?;
        writeln!(self.output, "  - Style: {style} (one of: {})", choices::<ImageStyle>())?;
        Ok(())
    }

    async fn step(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "-".repeat(RULE_WIDTH))?;

        let prompt = match ask(
            &mut self.input,
            &mut self.output,
            "\n💭 Enter image prompt (or 'quit' to exit): ",
        )? {
            Some(prompt) if !is_exit_keyword(&prompt) => prompt,
            _ => {
                self.state = LoopState::Exiting;
                return Ok(());
            }
        };

        if prompt.is_empty() {
            writeln!(self.output, "⚠️  Prompt cannot be empty!")?;
            return Ok(());
        }

        let Some(options) = self.read_options()? else {
            self.state = LoopState::Exiting;
            return Ok(());
        };

        match self.generator.generate_and_download(&prompt, &options).await {
            Some(_) => {
                self.image_count += 1;
                writeln!(
                    self.output,
                    "\n✅ Success! Total images generated: {}",
                    self.image_count
                )?;
            }
            None => writeln!(
                self.output,
                "\n⚠️  Failed to generate/download image. Please try again."
            )?,
        }

        tokio::time::sleep(self.generator.config().delay).await;
        Ok(())
    }

    /// `Ok(None)` when input ended before the custom-settings answer.
    fn read_options(&mut self) -> Result<Option<GenerationOptions>> {
        let Some(custom) = ask(
            &mut self.input,
            &mut self.output,
            "Use custom settings? (y/n, default: n): ",
        )?
        else {
            return Ok(None);
        };

        let mut options = GenerationOptions::new();
        if !custom.eq_ignore_ascii_case("y") {
            return Ok(Some(options));
        }

        let config = self.generator.config();
        let (size, quality, style) = (
            config.default_size,
            config.default_quality,
            config.default_style,
        );

        options.size = self.ask_choice("Size", size)?;
        options.quality = self.ask_choice("Quality", quality)?;
        options.style = self.ask_choice("Style", style)?;
        Ok(Some(options))
    }

    /// Blank, unrecognised or missing input keeps the default.
    fn ask_choice<T: FromStr + Display>(
        &mut self,
        label: &str,
        default: T,
    ) -> Result<Option<T>> {
        let answer = ask(
            &mut self.input,
            &mut self.output,
            &format!("{label} (default: {default}): "),
        )?
        .unwrap_or_default();

        if answer.is_empty() {
            return Ok(None);
        }

        match answer.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(
                    self.output,
                    "⚠️  Unknown {} '{}', using default {}",
                    label.to_lowercase(),
                    answer,
                    default
                )?;
                Ok(None)
            }
        }
    }
}
