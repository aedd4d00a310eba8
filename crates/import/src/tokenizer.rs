struct Scan {
    fields: Vec<String>,
    current: String,
    quoted: bool,
}

impl Scan {
    fn step(mut self, c: char) -> Self {
        match c {
            '"' => {
                self.current.push(c);
                self.quoted = !self.quoted;
            }
            ',' | ';' if !self.quoted => {
                let field = std::mem::take(&mut self.current);
                self.fields.push(field);
            }
            _ => self.current.push(c),
        }
        self
    }

    fn finish(mut self) -> Vec<String> {
        self.fields.push(self.current);
        self.fields.iter().map(|f| clean_field(f)).collect()
    }
}

/// Splits a statement line on `,` or `;`, except inside `"` quotes.
///
/// Unbalanced quotes are not an error: the rest of the
/// line is read with whatever quoting state was reached. An empty line
/// yields a single empty field.
pub fn tokenize(line: &str) -> Vec<String> {
    let start = Scan {
        fields: Vec::new(),
        current: String::new(),
        quoted: false,
    };
    line.chars().fold(start, Scan::step).finish()
}

fn clean_field(field: &str) -> String {
    let field = field.trim();
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.trim().to_string()
}
