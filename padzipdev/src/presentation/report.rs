use padzip_core::{ArchiveResult, FileFingerprint, PaddingResult};

const RULE: usize = 60;

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit_idx])
    }
}

/// Thousands separators: 1049576 -> "1,049,576".
pub fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn print_fingerprint(fp: &FileFingerprint, title: &str) {
    println!("\n{}", "=".repeat(RULE));
    println!("FILE INFORMATION: {title}");
    println!("{}", "=".repeat(RULE));
    println!("Filename: {}", fp.path.display());
    println!("Size: {} bytes ({})", grouped(fp.size), format_bytes(fp.size));
    for (alg, hex) in &fp.digests {
        println!("{:<8}{hex}", format!("{}:", alg.name().to_uppercase()));
    }
    println!("{}", "=".repeat(RULE));
}

pub fn print_padding(res: &PaddingResult) {
    println!("[+] Padding completed");
    println!("    Output file:   {}", res.destination.display());
    println!("    Fill:          {} (0x{:02x})", res.fill, res.fill_byte);
    println!("    Original size: {} bytes", grouped(res.original_size));
    println!(
        "    Final size:    {} bytes ({})",
        grouped(res.final_size),
        format_bytes(res.final_size)
    );
    println!("    Size increase: {} bytes", grouped(res.bytes_appended));
}

pub fn print_archive(res: &ArchiveResult) {
    for e in &res.entries {
        println!("    Added: {} ({} bytes)", e.name, grouped(e.size));
    }
    for p in &res.skipped {
        println!("    Skipped: {}", p.display());
    }
    println!("[+] Archive created: {}", res.archive.display());
    println!(
        "    Total original size: {} bytes",
        grouped(res.total_uncompressed)
    );
    println!("    Compressed size:     {} bytes", grouped(res.compressed_size));
    println!("    Compression ratio:   {:.2}:1", res.ratio());
    println!("    Space savings:       {:.1}%", res.space_savings());
}
