//! C header rendering for the packed bitmap.
//!
//! The generated file looks like:
//!
//! ```text
//! #ifndef _logo_h_
//! #define _logo_h_
//!
//! #define logo_width 384
//! #define logo_height 512
//! static const uint8_t PROGMEM logo_data[] = {
//! 0x0,0xff,...,
//! };
//!
//! #endif // _logo_h_
//! ```
//!
//! The printer feeds one packed column per print line, so `_width` is the
//! bitmap's row count (dots across the print head) and `_height` its column
//! count (lines fed).

use std::fmt::Write as _;
use std::path::Path;

use crate::error::ConvertError;
use crate::pipeline::Bitmap;

/// Symbol prefix for the header, taken from the output file stem.
///
/// Characters that are not valid in a C identifier become `_`, and a leading
/// digit gets a `_` prefix.
pub fn symbol_name(output: &Path) -> String {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Render the complete header text.
pub fn render(name: &str, bitmap: &Bitmap) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "#ifndef _{}_h_ ", name);
    let _ = writeln!(out, "#define _{}_h_ ", name);
    out.push('\n');
    let _ = writeln!(out, "#define {}_width {} ", name, bitmap.height);
    let _ = writeln!(out, "#define {}_height {} ", name, bitmap.width);
    let _ = writeln!(out, "static const uint8_t PROGMEM {}_data[] = {{", name);
    for line in &bitmap.lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("};\n");
    out.push('\n');
    let _ = writeln!(out, "#endif // _{}_h_", name);

    out
}

/// Write rendered header text to `path`.
pub fn write(path: &Path, text: &str) -> Result<(), ConvertError> {
    std::fs::write(path, text).map_err(|e| ConvertError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::BitGrid;

    fn sample_bitmap() -> Bitmap {
        Bitmap {
            height: 10,
            width: 2,
            lines: vec!["0xff,0x3,".to_string(), "0x0,0x1,".to_string()],
            ink: BitGrid::new(10, 2, vec![0; 20]).unwrap(),
        }
    }

    #[test]
    fn test_symbol_name() {
        assert_eq!(symbol_name(Path::new("logo.h")), "logo");
        assert_eq!(symbol_name(Path::new("out/cat_pic.h")), "cat_pic");
        assert_eq!(symbol_name(Path::new("my-image.h")), "my_image");
        assert_eq!(symbol_name(Path::new("1st.h")), "_1st");
    }

    #[test]
    fn test_render_layout() {
        let text = render("logo", &sample_bitmap());
        let expected = "#ifndef _logo_h_ \n\
                        #define _logo_h_ \n\
                        \n\
                        #define logo_width 10 \n\
                        #define logo_height 2 \n\
                        static const uint8_t PROGMEM logo_data[] = {\n\
                        0xff,0x3,\n\
                        0x0,0x1,\n\
                        };\n\
                        \n\
                        #endif // _logo_h_\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.h");
        let name = symbol_name(&path);
        assert_eq!(name, "pic");
        write(&path, &render(&name, &sample_bitmap())).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("#ifndef _pic_h_ \n"));
        assert!(text.contains("static const uint8_t PROGMEM pic_data[] = {\n"));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("pic.h");
        let err = write(&path, "x").unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
        assert!(err.to_string().contains("pic.h"));
    }
}
