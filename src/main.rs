fn main() {
    ecosort_lib::run()
}
