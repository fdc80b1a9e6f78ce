fn main() {
    // ESP-IDF link arguments are only needed for the firmware image; host
    // builds (library + tests) skip the toolchain probe entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
