use std::{
    env,
    fs::{self, File},
    io::{self, BufWriter, Write},
};

// Take all files under `palettes` and turn them into a file that contains a map with their
// contents by name. This is pulled in theme/palette.rs to construct the built in palettes.
fn build_palettes(out_dir: &str) -> io::Result<()> {
    let output_path = format!("{out_dir}/palettes.rs");
    let mut output_file = BufWriter::new(File::create(output_path)?);
    output_file.write_all(b"use std::collections::BTreeMap as Map;\n")?;
    output_file.write_all(b"use once_cell::sync::Lazy;\n")?;
    output_file.write_all(b"static PALETTES: Lazy<Map<&'static str, &'static [u8]>> = Lazy::new(|| Map::from([\n")?;

    let mut paths = fs::read_dir("palettes")?.collect::<io::Result<Vec<_>>>()?;
    paths.sort_by_key(|e| e.path());
    for palette_file in paths {
        let metadata = palette_file.metadata()?;
        if !metadata.is_file() {
            panic!("found non file in palettes directory");
        }
        let path = palette_file.path();
        let contents = fs::read(&path)?;
        let file_name = path.file_name().unwrap().to_string_lossy();
        let (palette_name, extension) = file_name.split_once('.').unwrap();
        if extension != "yaml" {
            panic!("extension must be 'yaml'");
        }
        output_file.write_all(format!("(\"{palette_name}\", {contents:?}.as_slice()),\n").as_bytes())?;
    }
    output_file.write_all(b"]));\n")?;

    // Rebuild if anything changes.
    println!("cargo:rerun-if-changed=palettes");
    Ok(())
}

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").unwrap();
    build_palettes(&out_dir)?;
    Ok(())
}
