fn main() {
    // Emits the ESP-IDF link/env directives when building for espidf;
    // prints nothing for host-target test builds.
    embuild::espidf::sysenv::output();
}
