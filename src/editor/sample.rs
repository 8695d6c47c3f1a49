//! Built-in showcase document loaded on first start and on demand.

/// Sample markdown exercising every feature of the preview.
pub const SAMPLE_DOCUMENT: &str = r##"# Welcome to mdpad

This is a **Markdown** editor with *live* HTML preview, math typesetting and export to Markdown, HTML, PNG and PDF.

## Features

### Text Formatting
- **Bold text** with `**bold**`
- *Italic text* with `*italic*`
- ~~Strikethrough~~ with `~~text~~`
- `Inline code` with backticks

### Lists

#### Unordered List
- Item 1
- Item 2
  - Nested item 2.1
  - Nested item 2.2
- Item 3

#### Ordered List
1. First item
2. Second item
3. Third item

#### Task List
- [x] Completed task
- [ ] Pending task
- [ ] Another pending task

### Code Blocks

Rust example:
```rust
fn greet(name: &str) {
    println!("Hello, {}!", name);
}

fn main() {
    greet("World");
}
```

Python example:
```python
def fibonacci(n):
    if n <= 1:
        return n
    return fibonacci(n-1) + fibonacci(n-2)

print(fibonacci(10))
```

### Blockquotes

> This is a blockquote.
> It can span multiple lines.
>
> — Famous Person

### Tables

| Feature | Supported | Notes |
|---------|-----------|-------|
| Markdown | ✅ | Full GFM support |
| PDF Export | ✅ | Paginated A4 output |
| RTL | ✅ | Right-to-left text |
| Themes | ✅ | 4 themes available |

### Links and Images

[Visit GitHub](https://github.com)

![Placeholder Image](https://via.placeholder.com/400x200/4a90e2/ffffff?text=Markdown+Preview)

### Mathematics (KaTeX)

Inline math: $E = mc^2$

Block math:

$$
\frac{-b \pm \sqrt{b^2 - 4ac}}{2a}
$$

$$
\sum_{i=1}^{n} i = \frac{n(n+1)}{2}
$$

### Horizontal Rules

---

### Footnotes

Here's a sentence with a footnote[^1].

[^1]: This is the footnote content.

## Export Options

You can export your document in multiple formats:

1. **Markdown (.md)** - Raw Markdown text
2. **HTML (.html)** - Complete HTML document
3. **PNG (.png)** - Image snapshot
4. **PDF (.pdf)** - Fully formatted PDF with styling

## RTL Support

Toggle the text direction to test right-to-left languages like Arabic or Hebrew.

مرحبا بك في محرر Markdown

## Tips

- Use the theme selector to change appearance
- Adjust font size for better readability
- All your work is saved automatically
- Nothing leaves your machine unless you export it

---

**Happy writing!** 📝
"##;
