//! Line-oriented prompts for the console front-end
//!
//! Every prompt falls back to its default on a blank answer and on end of
//! input, so a closed stdin can never trap the caller in a re-ask loop.

use std::io::{self, BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line without its terminator. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|answer| answer.trim().to_string()))
    }

    /// Free text; blank or end of input gives `None`
    pub fn ask_text(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.ask(prompt)?.filter(|answer| !answer.is_empty()))
    }

    pub fn ask_yes_no(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        let suffix = if default { " [Y/n]: " } else { " [y/N]: " };
        loop {
            let Some(answer) = self.ask(&format!("{prompt}{suffix}"))? else {
                return Ok(default);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer 'y' or 'n'.")?,
            }
        }
    }

    /// An integer in `min..=max`
    pub fn ask_int(
        &mut self,
        prompt: &str,
        default: usize,
        min: usize,
        max: usize,
    ) -> io::Result<usize> {
        loop {
            let Some(answer) = self.ask(&format!("{prompt} [{default}]: "))? else {
                return Ok(default);
            };
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(value),
                Ok(_) => writeln!(self.output, "Please enter a number between {min} and {max}.")?,
                Err(_) => writeln!(self.output, "Please enter a valid integer.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_output()).unwrap()
    }

    #[test]
    fn test_ask_int_reasks_until_valid() {
        let mut p = prompter("abc\n500\n7\n");
        assert_eq!(p.ask_int("How many bombs?", 3, 0, 200).unwrap(), 7);

        let out = output(p);
        assert!(out.contains("How many bombs? [3]: "));
        assert!(out.contains("Please enter a valid integer."));
        assert!(out.contains("Please enter a number between 0 and 200."));
    }

    #[test]
    fn test_defaults_on_blank_and_eof() {
        let mut p = prompter("\n");
        assert_eq!(p.ask_int("Food?", 3, 1, 100).unwrap(), 3);
        assert!(p.ask_yes_no("Again?", true).unwrap());
        assert_eq!(p.ask_text("Name: ").unwrap(), None);
    }

    #[test]
    fn test_ask_yes_no() {
        let mut p = prompter("maybe\nYES\nn\n");
        assert!(p.ask_yes_no("Again?", false).unwrap());
        assert!(!p.ask_yes_no("Again?", true).unwrap());
        assert!(output(p).contains("Please answer 'y' or 'n'."));
    }

    #[test]
    fn test_ask_text_trims() {
        let mut p = prompter("  Ann \r\n");
        assert_eq!(p.ask_text("Name: ").unwrap(), Some("Ann".to_string()));
    }
}
