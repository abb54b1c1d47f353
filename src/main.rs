fn main() {
    brick_stack::game::run();
}
