pub fn execute() -> String {
    [
        "📖 Commands",
        "",
        "Coins",
        "  coins [available]      List tracked coins (or every supported coin)",
        "  add <COIN>             Start tracking a coin",
        "  remove <ID|COIN>       Stop tracking a coin",
        "  select <COIN|none>     Select a coin, or clear the selection",
        "  refresh                Reload the selected coin's prices",
        "  price                  Price summary for the selected coin",
        "",
        "Trading",
        "  tx [reset]             Reload the trade log (reset: empty it first)",
        "  more                   Load the next page of the trade log",
        "  reason <ID>            Show the agent's reasoning for a trade",
        "  trade                  Run one trading cycle",
        "",
        "Balance",
        "  balance [more|reset]   Balance history, oldest first",
        "",
        "Notifications",
        "  toasts                 Show notifications",
        "  dismiss <N>            Hide notification N",
        "",
        "  quit                   Exit",
    ]
    .join("\n")
}
