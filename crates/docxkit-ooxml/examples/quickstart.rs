//! Example: Create a plain and a Markdown DOCX in the current directory
//!
//! Usage: cargo run --example quickstart

use docxkit_ooxml::{create_markdown_docx, Docx};

fn main() -> docxkit_ooxml::Result<()> {
    let path = Docx::new()
        .with_title("My Title")
        .with_body("This is the document body.")
        .create_new_docx(".")?;
    println!("{}", path.display());

    let text = r#"
#$# New
# Heading level 1
## Heading level 2
### Heading level 3
#### Heading level 4
##### Heading level 5
###### Heading level 6
I really like using **Markdown**.
"#;
    let path = create_markdown_docx(".", text)?;
    println!("{}", path.display());

    Ok(())
}
