fn main() -> Result<(), Box<dyn std::error::Error>> {
    bluejay::runtime::run()
}
