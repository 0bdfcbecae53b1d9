fn main() {
    if let Err(e) = symptom_checker::run() {
        eprintln!("symptom-checker: {e}");
        std::process::exit(1);
    }
}
